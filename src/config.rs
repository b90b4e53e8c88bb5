use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
    pub zokrates_bin: PathBuf,
    pub verification_key: PathBuf,
    pub verify_timeout_secs: u64,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var_or(name, default)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Config {
            server_host: var_or("SERVER_HOST", "127.0.0.1"),
            server_port: parse_var("SERVER_PORT", "8080")?,
            database_url: var_or("DATABASE_URL", "sqlite://zk_graph_auth.db?mode=rwc"),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "20")?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", "5")?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30")?,
            zokrates_bin: var_or("ZOKRATES_BIN", "zokrates").into(),
            verification_key: var_or("ZK_VERIFICATION_KEY", "./zk/verification.key").into(),
            verify_timeout_secs: parse_var("VERIFY_TIMEOUT_SECS", "20")?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.verify_timeout_secs == 0 {
            return Err(AppError::Config("VERIFY_TIMEOUT_SECS must be positive".to_string()));
        }
        if self.verify_timeout_secs >= self.request_timeout_secs {
            return Err(AppError::Config(
                "VERIFY_TIMEOUT_SECS must be below REQUEST_TIMEOUT_SECS".to_string(),
            ));
        }
        if self.db_min_connections > self.db_max_connections {
            return Err(AppError::Config(
                "DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        Ok(())
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
