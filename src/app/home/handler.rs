//! 主页处理器

pub const GREETING: &str = "Hello, World from the Dockerize App!";

/// GET /
pub async fn hello() -> &'static str {
    GREETING
}
