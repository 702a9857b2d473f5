use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub blob: BlobConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct BlobConfig {
    pub connection_string: String,
    pub container_name: String,
    pub account_name: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for BlobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobConfig")
            .field("connection_string", &"[REDACTED]")
            .field("container_name", &self.container_name)
            .field("account_name", &self.account_name)
            .finish()
    }
}

// Blob and SQL settings are not checked here; a missing value shows up as a
// failed upload or connection when the user acts.
fn optional_var(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                host: optional_var("SQL_SERVER"),
                port: env::var("SQL_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid SQL_PORT value".to_string()))?,
                database: optional_var("SQL_DATABASE").trim().to_string(),
                user: optional_var("SQL_USER"),
                password: optional_var("SQL_PASSWORD"),
            },
            blob: BlobConfig {
                connection_string: optional_var("BLOB_CONNECTION_STRING"),
                container_name: optional_var("BLOB_CONTAINER_NAME"),
                account_name: optional_var("BLOB_ACCOUNT_NAME"),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
