//! 主页模块

pub mod handler;

use axum::{routing::get, Router};

pub fn routes() -> Router {
    Router::new().route("/", get(handler::hello))
}
