//! Configuration loading

use anyhow::{Context, Result};
use salon_api::validation::{
    validate_email, validate_full_name, validate_new_password, validate_phone_number,
};
use salon_auth::{HashCost, SESSION_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Administrator account created at startup when its email is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC key for session tokens; usually supplied through `JWT_SECRET`
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
    #[serde(default)]
    pub password: PasswordConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_secs: default_session_ttl_secs(),
            password: PasswordConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Session lifetime, falling back to the default when not positive and
    /// capped at [`MAX_SESSION_TTL_SECS`]
    pub fn validated_session_ttl_secs(&self) -> i64 {
        if self.session_ttl_secs <= 0 {
            warn!(
                "session_ttl_secs {} is not positive, using default {}",
                self.session_ttl_secs, SESSION_TTL_SECS
            );
            SESSION_TTL_SECS
        } else if self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            warn!(
                "session_ttl_secs {} is too large, using {}",
                self.session_ttl_secs, MAX_SESSION_TTL_SECS
            );
            MAX_SESSION_TTL_SECS
        } else {
            self.session_ttl_secs
        }
    }
}

/// Argon2id cost configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            time_cost: default_time_cost(),
        }
    }
}

impl PasswordConfig {
    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_kib,
            time_cost: self.time_cost,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Seeded administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl AdminConfig {
    /// Apply the same rules registration enforces
    pub fn validate(&self) -> Result<()> {
        validate_full_name(&self.full_name).context("Invalid admin full_name")?;
        validate_email(&self.email).context("Invalid admin email")?;
        validate_phone_number(&self.phone_number).context("Invalid admin phone_number")?;
        validate_new_password(&self.password).context("Invalid admin password")?;
        Ok(())
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "./data/salon.db".to_string()
}

fn default_session_ttl_secs() -> i64 {
    SESSION_TTL_SECS
}

fn default_memory_kib() -> u32 {
    HashCost::default().memory_kib
}

fn default_time_cost() -> u32 {
    HashCost::default().time_cost
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT secret is not set; provide auth.jwt_secret or JWT_SECRET");
        }
        if let Some(admin) = &self.admin {
            admin.validate().context("Invalid [admin] settings")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.session_ttl_secs, 2_628_000);
        assert_eq!(config.auth.password.hash_cost(), HashCost::default());
        assert_eq!(config.logging.format, "pretty");
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [server]
            bind_address = "127.0.0.1"
            port = 8080

            [database]
            path = "/tmp/salon.db"

            [auth]
            jwt_secret = "s3cret"
            session_ttl_secs = 3600

            [auth.password]
            memory_kib = 32768
            time_cost = 3

            [logging]
            level = "debug"
            format = "json"

            [admin]
            full_name = "Salon Admin"
            email = "admin@example.com"
            phone_number = "081100000000"
            password = "Adm1n!Password"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "/tmp/salon.db");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.validated_session_ttl_secs(), 3600);
        assert_eq!(config.auth.password.memory_kib, 32768);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.admin.unwrap().email, "admin@example.com");
    }

    #[test]
    fn test_missing_jwt_secret_fails_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "   ".to_string();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "s3cret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_ttl_falls_back_to_default() {
        let mut auth = AuthConfig::default();
        auth.session_ttl_secs = 0;
        assert_eq!(auth.validated_session_ttl_secs(), SESSION_TTL_SECS);
    }

    #[test]
    fn test_oversized_ttl_is_capped() {
        let mut auth = AuthConfig::default();
        auth.session_ttl_secs = i64::MAX;
        assert_eq!(auth.validated_session_ttl_secs(), MAX_SESSION_TTL_SECS);

        auth.session_ttl_secs = MAX_SESSION_TTL_SECS;
        assert_eq!(auth.validated_session_ttl_secs(), MAX_SESSION_TTL_SECS);
    }

    fn admin() -> AdminConfig {
        AdminConfig {
            full_name: "Salon Admin".to_string(),
            email: "admin@example.com".to_string(),
            phone_number: "081100000000".to_string(),
            password: "Adm1n!Password".to_string(),
        }
    }

    #[test]
    fn test_admin_settings_are_validated() {
        let mut config = Config::default();
        config.auth.jwt_secret = "s3cret".to_string();
        config.admin = Some(admin());
        assert!(config.validate().is_ok());

        config.admin = Some(AdminConfig {
            password: "password".to_string(),
            ..admin()
        });
        assert!(config.validate().is_err());

        config.admin = Some(AdminConfig {
            email: "not-an-email".to_string(),
            ..admin()
        });
        assert!(config.validate().is_err());

        config.admin = Some(AdminConfig {
            phone_number: "12345".to_string(),
            ..admin()
        });
        assert!(config.validate().is_err());

        config.admin = Some(AdminConfig {
            full_name: "   ".to_string(),
            ..admin()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9000);

        let config = Config::load("/nonexistent/salon.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }
}
