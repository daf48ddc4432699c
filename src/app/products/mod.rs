//! 产品模块

pub mod handler;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

use handler::AppState;
use service::ProductService;

pub fn routes(product_service: ProductService) -> Router {
    Router::new()
        .route("/products", get(handler::list_products))
        .with_state(AppState { product_service })
}
