// Centralized configuration management for the marketplace backend
// Load ALL env vars ONCE at startup, then pass the value down explicitly

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub disable_embedded_migrations: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Database configuration (timeouts in seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

/// JWT configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry: u64,
    pub key_version: u32,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiry", &self.expiry)
            .field("key_version", &self.key_version)
            .finish()
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB
    pub password_memory_cost: u32,
    /// Argon2 iterations
    pub password_time_cost: u32,
    pub cors_allowed_origins: Vec<String>,
}

/// Tokens are not renewable, so their lifetime stays short
pub const MAX_TOKEN_EXPIRY: u64 = 86_400;

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn required_var(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError> {
    let raw = var_or(key, default);
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, &format!("cannot parse {:?}", raw)))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue(key.to_string(), reason.to_string())
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            server: ServerConfig {
                bind_address: var_or("BIND_ADDRESS", "0.0.0.0:3000"),
                environment: Environment::from(var_or("ENVIRONMENT", "development")),
                rust_log: var_or("RUST_LOG", "info"),
            },
            database: DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "10")?,
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", "0")?,
                connect_timeout: parse_var("DATABASE_CONNECT_TIMEOUT", "5")?,
                idle_timeout: parse_var("DATABASE_IDLE_TIMEOUT", "600")?,
                max_lifetime: parse_var("DATABASE_MAX_LIFETIME", "1800")?,
            },
            jwt: JwtConfig {
                secret: required_var("JWT_SECRET")?,
                expiry: parse_var("JWT_EXPIRY", "3600")?,
                key_version: parse_var("JWT_KEY_VERSION", "1")?,
            },
            security: SecurityConfig {
                password_memory_cost: parse_var("PASSWORD_MEMORY_COST", "19456")?,
                password_time_cost: parse_var("PASSWORD_TIME_COST", "2")?,
                cors_allowed_origins: var_or("CORS_ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            disable_embedded_migrations: parse_var("DISABLE_EMBEDDED_MIGRATIONS", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 32 {
            return Err(invalid("JWT_SECRET", "must be at least 32 characters long"));
        }
        if self.jwt.expiry == 0 || self.jwt.expiry > MAX_TOKEN_EXPIRY {
            return Err(invalid("JWT_EXPIRY", "must be between 1 and 86400 seconds"));
        }
        if self.database.max_connections == 0 {
            return Err(invalid("DATABASE_MAX_CONNECTIONS", "must be > 0"));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(invalid(
                "DATABASE_MIN_CONNECTIONS",
                "must be <= DATABASE_MAX_CONNECTIONS",
            ));
        }
        // bb8 panics on zero durations
        for (key, value) in [
            ("DATABASE_CONNECT_TIMEOUT", self.database.connect_timeout),
            ("DATABASE_IDLE_TIMEOUT", self.database.idle_timeout),
            ("DATABASE_MAX_LIFETIME", self.database.max_lifetime),
        ] {
            if value == 0 {
                return Err(invalid(key, "must be > 0"));
            }
        }
        if self.security.password_time_cost == 0 {
            return Err(invalid("PASSWORD_TIME_COST", "must be > 0"));
        }
        Ok(())
    }
}
