//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use validator::{Validate, ValidationError};

/// Environment variable selecting the configuration profile.
pub const ENV_VAR: &str = "LIKEBOARD_ENV";

/// Prefix for configuration overrides from the environment.
pub const ENV_PREFIX: &str = "LIKEBOARD";

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    /// Server configuration.
    #[validate(nested)]
    pub server: ServerConfig,
    /// Database configuration.
    #[validate(nested)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    #[validate(nested)]
    pub jwt: JwtConfig,
    /// Like feature configuration.
    #[serde(default)]
    pub likes: LikesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_pool_bounds"))]
pub struct DatabaseConfig {
    /// Connection URL (`postgres://...` or `sqlite:...`).
    #[validate(length(min = 1))]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Log every SQL statement at debug level.
    #[serde(default)]
    pub sql_logging: bool,
}

/// JWT signing and lifetime configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens.
    #[validate(length(min = 16, message = "jwt secret must be at least 16 bytes"))]
    pub secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_token_ttl")]
    #[validate(range(min = 60))]
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_token_ttl")]
    #[validate(range(min = 60))]
    pub refresh_token_ttl_secs: i64,
    /// Clock skew tolerated when checking `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

/// Which uniqueness rule governs likes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeScope {
    /// A post carries at most one like in total.
    #[default]
    Post,
    /// Each user may like a given post at most once.
    UserPost,
}

/// Like feature configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikesConfig {
    /// Uniqueness rule applied to the likes table.
    #[serde(default)]
    pub scope: LikeScope,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "http://127.0.0.1:5000".to_string(),
    ]
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_access_token_ttl() -> i64 {
    60 * 60
}

const fn default_refresh_token_ttl() -> i64 {
    30 * 24 * 60 * 60
}

const fn default_leeway() -> u64 {
    60
}

fn default_log_filter() -> String {
    "likeboard=info,tower_http=info,sea_orm=warn".to_string()
}

fn validate_pool_bounds(db: &DatabaseConfig) -> Result<(), ValidationError> {
    if db.min_connections > db.max_connections {
        return Err(ValidationError::new("min_connections_exceeds_max"));
    }
    Ok(())
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Configuration is then loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `LIKEBOARD_ENV`)
    /// 3. Environment variables with `LIKEBOARD__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = Self::environment();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(config)
    }

    /// Name of the active configuration profile.
    #[must_use]
    pub fn environment() -> String {
        std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
    }

    fn finish(config: config::Config) -> Result<Self, config::ConfigError> {
        let config: Self = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}
