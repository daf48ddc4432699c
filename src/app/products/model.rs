//! 产品数据模型

use serde::{Deserialize, Serialize};

/// 固定的示例产品记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: u32,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// `/products` 响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}
