mod app_config;
mod connection_string;

pub use app_config::{AppConfig, BlobConfig, DatabaseConfig, ServerConfig};
pub use connection_string::{BlobCredentials, StorageConnectionString};
