//! 产品业务服务

use std::sync::Arc;

use super::model::Product;

/// 只读产品目录，启动时构建一次，之后不再修改
#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<[Product]>,
}

impl ProductService {
    pub fn new() -> Self {
        let catalog: Vec<Product> = vec![
            Product::new(1, "Product A", 100),
            Product::new(2, "Product B", 150),
            Product::new(3, "Product C", 200),
        ];

        Self {
            catalog: catalog.into(),
        }
    }

    /// 按固定顺序返回全部产品
    pub fn list_products(&self) -> &[Product] {
        &self.catalog
    }
}

impl Default for ProductService {
    fn default() -> Self {
        Self::new()
    }
}
