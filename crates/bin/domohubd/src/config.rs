//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `domohub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Gateway client limits.
    pub gateway: GatewayConfig,
    /// First-run seeding.
    pub bootstrap: BootstrapConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Seconds a statement waits on a locked database.
    pub busy_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Gateway client cache limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Seconds allowed for reading a gateway record on a cache miss.
    pub lookup_timeout_secs: u64,
    /// Seconds allowed for resolving a gateway and opening a session.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Name of the environment created on first run.
    pub default_environment: String,
}

impl Config {
    /// Load configuration from `domohub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("domohub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DOMOHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("DOMOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(secs) = var("DOMOHUB_GATEWAY_LOOKUP_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.gateway.lookup_timeout_secs = secs;
        }
        if let Some(secs) =
            var("DOMOHUB_GATEWAY_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.gateway.connect_timeout_secs = secs;
        }
        if let Some(val) = var("DOMOHUB_DEFAULT_ENVIRONMENT") {
            self.bootstrap.default_environment = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.busy_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "database busy timeout must be non-zero".to_string(),
            ));
        }
        if self.gateway.lookup_timeout_secs == 0 || self.gateway.connect_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway timeouts must be non-zero".to_string(),
            ));
        }
        if self.bootstrap.default_environment.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default environment name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.database.busy_timeout_secs)
    }

    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.lookup_timeout_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.connect_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:domohub.db?mode=rwc".to_string(),
            busy_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "domohubd=info,domohub_app=info,domohub_adapter_gateway_tcp=info,domohub_adapter_storage_sqlite_sqlx=info,sqlx=warn"
                .to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: 5,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            default_environment: "Home".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
