mod connection;
mod gateway;

pub use connection::{check_health, connect_options, open_connection};
pub use gateway::{PgProductStore, ProductStore};
