//! HTTP API: configuration, middleware pipeline, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;

pub use config::{AppConfig, ConfigError, Environment};
