//! Products Data

use crate::domain::{products::records::ProductUuid, shops::records::ShopUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub shop: ShopUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub is_available: bool,
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub is_available: bool,
}
