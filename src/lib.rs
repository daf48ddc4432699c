//! # Dockerize App
//!
//! 一个最小的 Axum HTTP 服务，按分层架构组织：
//! - `app`：业务处理器（主页、产品列表）
//! - `core`：错误处理与中间件
//! - `infrastructure`：配置、日志、服务器生命周期

pub mod app;
pub mod core;
pub mod infrastructure;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::app::products::service::ProductService;
use crate::core::{
    error::{handle_panic, not_found},
    middleware::{json_body_middleware, request_logging_middleware},
};

pub use crate::core::error::ServerError;
pub use crate::infrastructure::{
    config::AppConfig,
    logger::Logger,
    server::{shutdown_signal, Server},
};

/// 组装完整的应用路由和中间件栈
pub fn build_app() -> Router {
    Router::new()
        .merge(app::home::routes())
        .merge(app::products::routes(ProductService::new()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(json_body_middleware))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
}
