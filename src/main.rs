//! Dockerize App 服务入口

use dockerize_app::{build_app, shutdown_signal, AppConfig, Logger, Server, ServerError};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(ServerError::from)?;
    Logger::init(&config.log_filter);

    info!("启动 Dockerize App 服务器...");

    let server = Server::bind(config.socket_addr()).await?;
    info!("📖 可用的路由:");
    info!("   GET  /          - 问候语");
    info!("   GET  /products  - 产品列表");

    server.serve(build_app(), shutdown_signal()).await?;
    Ok(())
}
