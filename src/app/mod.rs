//! 应用层

pub mod home;
pub mod products;
