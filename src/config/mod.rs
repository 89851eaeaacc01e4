//! Configuration management for rmauth
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 900;
/// 30 days
const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,

    /// Current environment
    pub environment: Environment,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// JWT secret for access token signing
    pub jwt_secret: String,

    /// Access token TTL in seconds (default: 900 = 15 minutes)
    pub jwt_access_token_ttl_seconds: i64,

    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && environment.is_production() {
            return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
        }

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .unwrap_or(5);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()))
            }
            _ => DEV_JWT_SECRET.to_string(),
        };

        let jwt_access_token_ttl_seconds =
            parse_access_token_ttl(env::var("JWT_ACCESS_TOKEN_TTL_SECONDS").ok().as_deref())?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(bcrypt::DEFAULT_COST)
            .clamp(4, 31);

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            jwt_secret,
            jwt_access_token_ttl_seconds,
            bcrypt_cost,
        })
    }

    /// Database URL with the password masked, for logging
    pub fn database_url_masked(&self) -> Option<String> {
        self.database_url.as_deref().map(mask_database_url)
    }
}

/// Access token lifetime in seconds; must lie in `1..=30 days`
fn parse_access_token_ttl(raw: Option<&str>) -> Result<i64, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_ACCESS_TOKEN_TTL_SECONDS);
    };

    match raw.parse::<i64>() {
        Ok(ttl) if (1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&ttl) => Ok(ttl),
        _ => Err(ConfigError::InvalidValue(format!(
            "JWT_ACCESS_TOKEN_TTL_SECONDS must be between 1 and {}, got '{}'",
            MAX_ACCESS_TOKEN_TTL_SECONDS, raw
        ))),
    }
}

fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            // Scheme colon only: no password to hide
            if !url[colon_pos + 1..].starts_with("//") {
                let prefix = &url[..colon_pos + 1];
                let suffix = &url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
    }
    url.to_string()
}
