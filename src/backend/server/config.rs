/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * opening the SQLite database.
 *
 * # Configuration Sources
 *
 * 1. Built-in defaults suitable for local development
 * 2. An optional TOML file named by `DUETCHAT_CONFIG`
 * 3. Environment variables (a `.env` file is loaded by the binary)
 *
 * Later sources override earlier ones. The merged result is validated once;
 * the server refuses to start on an invalid configuration.
 *
 * # Environment Keys
 *
 * `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`, `JWT_SECRET`,
 * `TOKEN_TTL_DAYS`, `COOKIE_SECURE`, `CLIENT_ORIGIN`, `BCRYPT_COST`,
 * `BODY_LIMIT_BYTES`, `REALTIME_BUFFER`, `STATIC_DIR`,
 * `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_UPLOAD_PRESET`, `CLOUDINARY_API_BASE`.
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::backend::auth::sessions::{AuthSettings, MAX_TOKEN_TTL_DAYS};
use crate::backend::media::upload::{MediaSettings, DEFAULT_API_BASE};

/// Environment variable naming an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "DUETCHAT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_days: u64,
    pub cookie_secure: bool,
    /// Browser origin allowed to make credentialed requests
    pub client_origin: Option<String>,
    pub bcrypt_cost: u32,
    pub body_limit_bytes: usize,
    /// Per-connection realtime buffer, in events
    pub realtime_buffer: usize,
    /// Prebuilt frontend served for non-API paths
    pub static_dir: Option<PathBuf>,
    pub media: Option<MediaSettings>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            database_url: "sqlite://duetchat.db".to_string(),
            jwt_secret: String::new(),
            token_ttl_days: 7,
            cookie_secure: false,
            client_origin: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            body_limit_bytes: 10 * 1024 * 1024,
            realtime_buffer: 64,
            static_dir: None,
            media: None,
        }
    }
}

impl ServerConfig {
    /// Load defaults, then the optional config file, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
                tracing::info!("[Config] Loaded {}", path.display());
                Self::from_toml_str(&contents)?
            }
            _ => Self::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_string("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env_parse("SERVER_PORT")? {
            self.port = port;
        }
        if let Some(url) = env_string("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(secret) = env_string("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(days) = env_parse("TOKEN_TTL_DAYS")? {
            self.token_ttl_days = days;
        }
        if let Some(secure) = env_bool("COOKIE_SECURE")? {
            self.cookie_secure = secure;
        }
        if let Some(origin) = env_string("CLIENT_ORIGIN") {
            self.client_origin = Some(origin);
        }
        if let Some(cost) = env_parse("BCRYPT_COST")? {
            self.bcrypt_cost = cost;
        }
        if let Some(limit) = env_parse("BODY_LIMIT_BYTES")? {
            self.body_limit_bytes = limit;
        }
        if let Some(buffer) = env_parse("REALTIME_BUFFER")? {
            self.realtime_buffer = buffer;
        }
        if let Some(dir) = env_string("STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }

        let cloud_name = env_string("CLOUDINARY_CLOUD_NAME");
        let upload_preset = env_string("CLOUDINARY_UPLOAD_PRESET");
        let api_base = env_string("CLOUDINARY_API_BASE");
        match (cloud_name, upload_preset) {
            (Some(cloud_name), Some(upload_preset)) => {
                self.media = Some(MediaSettings {
                    cloud_name,
                    upload_preset,
                    api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                });
            }
            (None, None) => {
                if let (Some(media), Some(api_base)) = (self.media.as_mut(), api_base) {
                    media.api_base = api_base;
                }
            }
            _ => {
                return Err(ConfigError::Invalid(
                    "CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET must be set together".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET must be set".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("SERVER_PORT must be non-zero".to_string()));
        }
        if self.realtime_buffer == 0 {
            return Err(ConfigError::Invalid("REALTIME_BUFFER must be non-zero".to_string()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.token_ttl_days) {
            return Err(ConfigError::Invalid(format!(
                "TOKEN_TTL_DAYS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_DAYS, self.token_ttl_days
            )));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_HOST",
                value: self.host.clone(),
            })
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_days: self.token_ttl_days,
            cookie_secure: self.cookie_secure,
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    env_string(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value: value.clone() })
        })
        .transpose()
}

fn env_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    env_string(key)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value: value.clone() }),
        })
        .transpose()
}

/// Open the SQLite database and run embedded migrations
///
/// In-memory databases are pinned to a single connection that never
/// expires, since each new connection would see an empty database.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    tracing::info!("[Database] Connecting to {}", database_url);
    let pool = pool_options.connect_with(options).await?;

    tracing::info!("[Database] Running migrations");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
