//! Product Records

use jiff::Timestamp;

use crate::{domain::shops::records::ShopUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub shop: ShopUuid,
    pub name: String,

    /// Current price in minor units. Orders snapshot it at checkout.
    pub price: u64,
    pub stock: u32,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Whether the product can currently be put in a cart or ordered.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.is_available && self.deleted_at.is_none()
    }
}
