use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::trace::TraceLayer;

use crate::{
    config::AppConfig,
    database::{PgProductStore, ProductStore},
    error::Result,
    routes,
    services::{AzureBlobStore, BlobStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            products: Arc::new(PgProductStore::new(config.database.clone())),
            blobs: Arc::new(AzureBlobStore::new(config.blob.clone())),
        }
    }
}

pub fn router(state: AppState, max_body_size: usize) -> Router {
    routes::create_router()
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let state = AppState::from_config(config);

    tracing::info!(
        "Catalog wired to database {}/{} and blob container {}",
        config.database.host,
        config.database.database,
        config.blob.container_name
    );

    Ok(router(state, config.server.max_body_size))
}
