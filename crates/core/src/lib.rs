//! `coursebook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage, no IO).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::IdSequence;
pub use value_object::ValueObject;

#[doc(hidden)]
pub use serde as __serde;
