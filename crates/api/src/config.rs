//! Application configuration.
//!
//! Values are resolved in layers: built-in defaults, then `config/default.toml`,
//! then `config/<environment>.toml` (tables merged key by key), then environment
//! variables. Missing files are skipped; malformed ones are errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, File};
use serde::Deserialize;
use thiserror::Error;

use coursebook_courses::IdAssignment;
use coursebook_observability::LogFormat;

/// Prefix of the environment variables that override file values
/// (`APP_NAME`, `APP_MAIL__HOST`, ...).
const ENV_PREFIX: &str = "APP";

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("unknown environment: {0:?} (expected development, production or test)")]
    UnknownEnvironment(String),
}

/// Deployment environment. Development is the default, as with most web stacks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub host: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub port: u16,
    pub environment: Environment,
    pub public_dir: PathBuf,
    pub id_assignment: IdAssignment,
    /// Unset means "pick from the environment" (see [`AppConfig::log_format`]).
    pub log_format: Option<LogFormat>,
    pub mail: MailConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Coursebook".to_string(),
            port: 3000,
            environment: Environment::default(),
            public_dir: PathBuf::from("public"),
            id_assignment: IdAssignment::default(),
            log_format: None,
            mail: MailConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment and `$APP_CONFIG_DIR` (default `config/`).
    pub fn load() -> Result<Self, ConfigError> {
        let dir = std::env::var("APP_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Self::load_with(Path::new(&dir), std::env::vars().collect())
    }

    /// Load from `dir`, with `vars` standing in for the process environment.
    pub fn load_with(dir: &Path, vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::builder()
            .add_source(toml_file(dir, "default"))
            .build()?;

        let environment: Environment = match vars.get("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => match defaults.get_string("environment") {
                Ok(raw) => raw.parse()?,
                Err(config::ConfigError::NotFound(_)) => Environment::default(),
                Err(e) => return Err(e.into()),
            },
        };

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(toml_file(dir, environment.as_str()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars.clone().into_iter().collect())),
            )
            // Already resolved above; the file spelling may differ in case.
            .set_override("environment", environment.as_str())?;

        if let Some(raw) = vars.get("PORT") {
            let port: u16 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
            builder = builder.set_override("port", i64::from(port))?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or(if self.environment.is_development() {
            LogFormat::Compact
        } else {
            LogFormat::Json
        })
    }

    /// Per-request access logging only runs in development.
    pub fn access_log_enabled(&self) -> bool {
        self.environment.is_development()
    }
}

fn toml_file(dir: &Path, stem: &str) -> File<config::FileSourceFile, config::FileFormat> {
    File::from(dir.join(format!("{stem}.toml")))
        .format(config::FileFormat::Toml)
        .required(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn defaults_without_files_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_with(dir.path(), env_of(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 3000);
        assert!(config.access_log_enabled());
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn environment_file_overlays_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            "name = \"Course Catalog\"\nport = 4000\n[mail]\nhost = \"mail.dev\"\n",
        );
        write(
            dir.path(),
            "production.toml",
            "id_assignment = \"length_plus_one\"\n[mail]\nhost = \"mail.prod\"\n",
        );

        let config =
            AppConfig::load_with(dir.path(), env_of(&[("APP_ENV", "production")])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.name, "Course Catalog");
        assert_eq!(config.port, 4000);
        assert_eq!(config.mail.host, "mail.prod");
        assert_eq!(config.id_assignment, IdAssignment::LengthPlusOne);
        assert!(!config.access_log_enabled());
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn environment_can_come_from_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "environment = \"test\"\n");
        write(dir.path(), "test.toml", "port = 5555\n");

        let config = AppConfig::load_with(dir.path(), env_of(&[])).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.port, 5555);
    }

    #[test]
    fn env_vars_win_over_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "port = 4000\nlog_format = \"json\"\n");

        let config = AppConfig::load_with(
            dir.path(),
            env_of(&[
                ("PORT", "8081"),
                ("APP_NAME", "override"),
                ("APP_PUBLIC_DIR", "/srv/static"),
                ("APP_MAIL__HOST", "smtp.example"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.name, "override");
        assert_eq!(config.public_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.mail.host, "smtp.example");
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_with(dir.path(), env_of(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "eighty"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_with(dir.path(), env_of(&[("APP_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "port = = 1\n");
        let err = AppConfig::load_with(dir.path(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn environment_file_keeps_untouched_default_keys() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            "public_dir = \"assets\"\n[mail]\nhost = \"mail.dev\"\n",
        );
        write(dir.path(), "test.toml", "log_format = \"compact\"\n");

        let config = AppConfig::load_with(dir.path(), env_of(&[("APP_ENV", "test")])).unwrap();
        assert_eq!(config.public_dir, PathBuf::from("assets"));
        assert_eq!(config.mail.host, "mail.dev");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn environment_spelling_in_file_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "environment = \"Production\"\n");

        let config = AppConfig::load_with(dir.path(), env_of(&[])).unwrap();
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn unrelated_env_vars_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_with(
            dir.path(),
            env_of(&[("APP_CONFIG_DIR", "elsewhere"), ("HOME", "/root")]),
        )
        .unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
