use async_trait::async_trait;
use sqlx::{Connection, PgConnection, postgres::PgConnectOptions};

use crate::{
    config::DatabaseConfig,
    database::connection::{self, open_connection},
    error::Result,
    models::{NewProduct, Product},
    queries::product_queries,
};

/// Storage for catalog rows.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: &NewProduct) -> Result<()>;

    async fn list_all(&self) -> Result<Vec<Product>>;

    async fn check_health(&self) -> Result<()>;
}

/// PostgreSQL gateway. Every call opens its own connection and closes it
/// before returning, whatever the outcome of the statement.
#[derive(Clone)]
pub struct PgProductStore {
    options: PgConnectOptions,
}

impl std::fmt::Debug for PgProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgProductStore")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .finish_non_exhaustive()
    }
}

impl PgProductStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_options(connection::connect_options(&config))
    }

    pub fn with_options(options: PgConnectOptions) -> Self {
        Self { options }
    }
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, product: &NewProduct) -> Result<()> {
        let mut conn = open_connection(&self.options).await?;
        let result = product_queries::insert_product(&mut conn, product).await;
        close(conn).await;
        result
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        let mut conn = open_connection(&self.options).await?;
        let result = product_queries::list_products(&mut conn).await;
        close(conn).await;
        result
    }

    async fn check_health(&self) -> Result<()> {
        let mut conn = open_connection(&self.options).await?;
        let result = connection::check_health(&mut conn).await;
        close(conn).await;
        result
    }
}
