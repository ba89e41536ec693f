//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Database credentials use the plain
//! `USER`, `PASSWORD`, `DBNAME` and `PORT` keys.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Raw value found in the environment.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// What `POST /users` does when the body has no `age`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAgePolicy {
    /// Leave the column out of the insert so the schema default applies.
    #[default]
    SchemaDefault,
    /// Treat the body as malformed.
    Reject,
}

impl FromStr for MissingAgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "schema_default" => Ok(Self::SchemaDefault),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected `default` or `reject`, got `{other}`")),
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Target database.
    pub dbname: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum idle connections in the pool.
    pub min_connections: u32,
    /// Timeout in seconds for acquiring a connection.
    pub connect_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ApiConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Handling of create requests without an `age`.
    pub missing_age_policy: MissingAgePolicy,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl ApiConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first, so a `.env` file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `LISTEN_ADDR`, `PORT` or
    /// `MISSING_AGE_POLICY` is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr =
            parse_required(&lookup, "LISTEN_ADDR", "0.0.0.0:8080".parse().ok())?;
        let port: u16 = parse_required(&lookup, "PORT", Some(5432))?;
        let missing_age_policy: MissingAgePolicy =
            parse_required(&lookup, "MISSING_AGE_POLICY", Some(MissingAgePolicy::default()))?;

        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            user: lookup("USER").unwrap_or_else(|| "postgres".to_string()),
            password: lookup("PASSWORD").unwrap_or_default(),
            dbname: lookup("DBNAME").unwrap_or_else(|| "postgres".to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1),
            connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
        };

        let log_json = matches!(
            lookup("LOG_FORMAT").as_deref().map(str::trim),
            Some("json") | Some("JSON")
        );

        Ok(Self {
            listen_addr,
            database,
            missing_age_policy,
            log_json,
        })
    }
}

/// Parses `key` as `T`; an unset key yields `default`, a bad value is an
/// error.
fn parse_required<F, T>(
    lookup: &F,
    key: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(value) => {
            let parsed: Result<T, T::Err> = value.trim().parse();
            parsed.map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
        None => default.ok_or_else(|| ConfigError::Invalid {
            key,
            value: String::new(),
            reason: "no default".to_string(),
        }),
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
