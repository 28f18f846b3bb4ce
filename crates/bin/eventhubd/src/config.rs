//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `eventhub.toml` in the working directory. Every field except the
//! token secret has a sensible default so the file is optional. Environment
//! variables take precedence over file values.

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use eventhub_domain::event::DeletePolicy;

const CONFIG_FILE: &str = "eventhub.toml";

/// Longest token lifetime accepted from configuration.
const MAX_TOKEN_TTL: TimeDelta = TimeDelta::days(366);

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Token settings.
    pub auth: AuthConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds a request waits for a free connection.
    pub acquire_timeout_secs: u64,
    /// What deleting an event does to its registrations.
    pub delete_policy: DeletePolicy,
}

/// Token configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Required.
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub token_ttl_minutes: i64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `eventhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override does not parse, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
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

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("EVENTHUB_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("EVENTHUB_PORT") {
            self.server.port = parse_var("EVENTHUB_PORT", &val)?;
        }
        if let Some(val) = var("EVENTHUB_BIND") {
            let (host, port) = val
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::InvalidVar("EVENTHUB_BIND", val.clone()))?;
            self.server.host = host.to_string();
            self.server.port = parse_var("EVENTHUB_BIND", port)?;
        }
        if let Some(val) = var("EVENTHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("EVENTHUB_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("EVENTHUB_DB_MAX_CONNECTIONS", &val)?;
        }
        if let Some(val) = var("EVENTHUB_DB_MIN_CONNECTIONS") {
            self.database.min_connections = parse_var("EVENTHUB_DB_MIN_CONNECTIONS", &val)?;
        }
        if let Some(val) = var("EVENTHUB_DB_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                parse_var("EVENTHUB_DB_ACQUIRE_TIMEOUT_SECS", &val)?;
        }
        if let Some(val) = var("EVENTHUB_DELETE_POLICY") {
            self.database.delete_policy = parse_var("EVENTHUB_DELETE_POLICY", &val)?;
        }
        if let Some(val) = var("EVENTHUB_JWT_SECRET") {
            self.auth.jwt_secret = val;
        }
        if let Some(val) = var("EVENTHUB_TOKEN_TTL_MINUTES") {
            self.auth.token_ttl_minutes = parse_var("EVENTHUB_TOKEN_TTL_MINUTES", &val)?;
        }
        if let Some(val) = var("EVENTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.min_connections == 0 {
            return Err(ConfigError::Validation(
                "database.min_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret must be set (or EVENTHUB_JWT_SECRET)".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Validation(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }
        self.token_ttl()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Storage adapter settings derived from the `[database]` section.
    #[must_use]
    pub fn storage(&self) -> eventhub_adapter_storage_sqlite_sqlx::Config {
        let mut storage = eventhub_adapter_storage_sqlite_sqlx::Config::new(&self.database.url);
        storage.max_connections = self.database.max_connections;
        storage.min_connections = self.database.min_connections;
        storage.acquire_timeout = Duration::from_secs(self.database.acquire_timeout_secs);
        storage
    }

    /// Token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the lifetime exceeds one year.
    pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
        TimeDelta::try_minutes(self.auth.token_ttl_minutes)
            .filter(|ttl| *ttl <= MAX_TOKEN_TTL)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "auth.token_ttl_minutes ({}) exceeds {} minutes",
                    self.auth.token_ttl_minutes,
                    MAX_TOKEN_TTL.num_minutes()
                ))
            })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidVar(name, raw.to_string()))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        use eventhub_adapter_storage_sqlite_sqlx::pool;

        Self {
            url: "sqlite:api.db?mode=rwc".to_string(),
            max_connections: pool::DEFAULT_MAX_CONNECTIONS,
            min_connections: pool::DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: pool::DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
            delete_policy: DeletePolicy::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: eventhub_adapter_auth::DEFAULT_TOKEN_TTL.num_minutes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "eventhubd=info,eventhub_app=info,eventhub_adapter_storage_sqlite_sqlx=info,tower_http=debug"
                .to_string(),
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
    /// An environment variable holds a value of the wrong shape.
    #[error("invalid value `{1}` for {0}")]
    InvalidVar(&'static str, String),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
