//! 产品处理器

use axum::{extract::State, response::Json};

use super::{model::ProductList, service::ProductService};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// GET /products
pub async fn list_products(State(state): State<AppState>) -> Json<ProductList> {
    Json(ProductList {
        products: state.product_service.list_products().to_vec(),
    })
}
