//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, shops::records::ShopUuid, users::records::UserUuid},
    pricing::PricedLine,
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub customer: UserUuid,
    pub product: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart item joined with its product and shop, as shown to the customer.
///
/// `unit_price` is the product's live price, not a snapshot.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub uuid: CartItemUuid,
    pub product: ProductUuid,
    pub product_name: String,
    pub unit_price: u64,
    pub stock: u32,
    pub quantity: u32,
    pub shop: ShopUuid,
    pub shop_name: String,
}

impl CartLine {
    #[must_use]
    pub const fn priced(&self) -> PricedLine {
        PricedLine::new(self.unit_price, self.quantity)
    }
}
