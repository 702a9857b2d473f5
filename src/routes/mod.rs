mod health;
mod products;

use axum::{Router, routing::get};

use crate::AppState;

pub use products::{LIST_LOADED, SAVE_SUCCEEDED, collect_form};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route(
            "/products",
            get(products::list_products).post(products::save_product),
        )
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
