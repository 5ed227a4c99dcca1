//! Configuration module for Estate.

use serde::Deserialize;
use std::path::Path;

use crate::auth::TokenService;
use crate::{EstateError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/estate.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 time cost (iterations).
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 parallelism.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

fn default_token_expiry() -> u64 {
    3600 // 1 hour
}

fn default_hash_memory() -> u32 {
    19456 // 19 MiB
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_secs: default_token_expiry(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

/// Media upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory uploaded media is written to.
    #[serde(default = "default_uploads_path")]
    pub path: String,
    /// URL prefix the directory is served under.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Maximum size of a single file in megabytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u64,
    /// Maximum number of files per listing.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_uploads_path() -> String {
    "uploads".to_string()
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    50
}

fn default_max_files() -> usize {
    5
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            path: default_uploads_path(),
            public_prefix: default_public_prefix(),
            max_file_size_mb: default_max_file_size(),
            max_files: default_max_files(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/estate.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebConfig {
    /// CORS allowed origins (empty = any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upload configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EstateError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| EstateError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ESTATE_JWT_SECRET`: signing secret
    /// - `ESTATE_DATABASE_PATH`: SQLite database file
    /// - `ESTATE_PORT`: listen port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("ESTATE_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(path) = std::env::var("ESTATE_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(port) = std::env::var("ESTATE_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid ESTATE_PORT value: {}", port),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is not set
    /// - the token lifetime is zero or too large to represent
    /// - upload limits are zero
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(EstateError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via ESTATE_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        let max_expiry = TokenService::MAX_LIFETIME_SECS as u64;
        if !(1..=max_expiry).contains(&self.auth.token_expiry_secs) {
            return Err(EstateError::Config(format!(
                "auth.token_expiry_secs must be between 1 and {max_expiry}"
            )));
        }
        if self.uploads.max_file_size_mb == 0 || self.uploads.max_files == 0 {
            return Err(EstateError::Config(
                "uploads.max_file_size_mb and uploads.max_files must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);

        assert_eq!(config.database.path, "data/estate.db");

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.token_expiry_secs, 3600);
        assert_eq!(config.auth.hash_memory_kib, 19456);
        assert_eq!(config.auth.hash_iterations, 2);
        assert_eq!(config.auth.hash_parallelism, 1);

        assert_eq!(config.uploads.path, "uploads");
        assert_eq!(config.uploads.public_prefix, "/uploads");
        assert_eq!(config.uploads.max_file_size_mb, 50);
        assert_eq!(config.uploads.max_files, 5);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/estate.log");

        assert!(config.web.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "custom/estate.sqlite"

[auth]
jwt_secret = "test-secret-key"
token_expiry_secs = 600
hash_memory_kib = 4096
hash_iterations = 3
hash_parallelism = 2

[uploads]
path = "media"
public_prefix = "/media"
max_file_size_mb = 10
max_files = 3

[logging]
level = "debug"
file = "custom/logs/app.log"

[web]
cors_origins = ["http://localhost:3000"]
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "custom/estate.sqlite");
        assert_eq!(config.auth.jwt_secret, "test-secret-key");
        assert_eq!(config.auth.token_expiry_secs, 600);
        assert_eq!(config.auth.hash_memory_kib, 4096);
        assert_eq!(config.auth.hash_iterations, 3);
        assert_eq!(config.auth.hash_parallelism, 2);
        assert_eq!(config.uploads.path, "media");
        assert_eq!(config.uploads.public_prefix, "/media");
        assert_eq!(config.uploads.max_file_size_mb, 10);
        assert_eq!(config.uploads.max_files, 3);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.token_expiry_secs, 3600);
        assert_eq!(config.uploads.max_files, 5);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(EstateError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(EstateError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides() {
        let original_secret = std::env::var("ESTATE_JWT_SECRET").ok();
        let original_port = std::env::var("ESTATE_PORT").ok();

        std::env::set_var("ESTATE_JWT_SECRET", "env-secret-key");
        std::env::set_var("ESTATE_PORT", "not-a-port");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.auth.jwt_secret, "env-secret-key");
        // Invalid port is ignored
        assert_eq!(config.server.port, 5000);

        match original_secret {
            Some(val) => std::env::set_var("ESTATE_JWT_SECRET", val),
            None => std::env::remove_var("ESTATE_JWT_SECRET"),
        }
        match original_port {
            Some(val) => std::env::set_var("ESTATE_PORT", val),
            None => std::env::remove_var("ESTATE_PORT"),
        }
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        let result = config.validate();
        assert!(matches!(result, Err(EstateError::Config(msg)) if msg.contains("jwt_secret")));
    }

    #[test]
    fn test_validate_rejects_zero_upload_limits() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config.uploads.max_files = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_token_expiry_bounds() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();

        config.auth.token_expiry_secs = 0;
        assert!(matches!(config.validate(), Err(EstateError::Config(_))));

        config.auth.token_expiry_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(EstateError::Config(_))));

        config.auth.token_expiry_secs = TokenService::MAX_LIFETIME_SECS as u64;
        assert!(config.validate().is_ok());
    }
}
