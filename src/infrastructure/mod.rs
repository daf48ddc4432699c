//! 基础设施层：配置、日志、服务器

pub mod config;
pub mod logger;
pub mod server;
