//! Cart Handlers

pub(crate) mod add_item;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove_item;
pub(crate) mod update_item;

#[cfg(test)]
mod tests {
    use petmart_app::domain::{
        carts::records::{CartItemRecord, CartItemUuid, CartLine},
        products::records::ProductUuid,
        shops::records::ShopUuid,
    };

    use jiff::Timestamp;

    use crate::test_helpers::TEST_CUSTOMER;

    pub(super) fn make_item(uuid: CartItemUuid, product: ProductUuid, quantity: u32) -> CartItemRecord {
        CartItemRecord {
            uuid,
            customer: TEST_CUSTOMER.user,
            product,
            quantity,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(super) fn make_line(name: &str, unit_price: u64, quantity: u32, shop: ShopUuid) -> CartLine {
        CartLine {
            uuid: CartItemUuid::new(),
            product: ProductUuid::new(),
            product_name: name.to_string(),
            unit_price,
            stock: 10,
            quantity,
            shop,
            shop_name: "Paws".to_string(),
        }
    }
}
