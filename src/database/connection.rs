use sqlx::{
    Connection, PgConnection,
    postgres::PgConnectOptions,
};

use crate::{config::DatabaseConfig, error::Result};

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
}

pub async fn open_connection(options: &PgConnectOptions) -> Result<PgConnection> {
    let conn = PgConnection::connect_with(options).await?;

    tracing::debug!(
        "Database connection opened to {}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    );

    Ok(conn)
}

pub async fn check_health(conn: &mut PgConnection) -> Result<()> {
    sqlx::query("SELECT 1").execute(&mut *conn).await?;
    Ok(())
}
