//! Order Data

use crate::domain::{
    orders::records::{OrderUuid, PaymentMethod},
    shops::{
        delivery::{DeliveryType, Fulfilment},
        records::ShopUuid,
    },
    users::records::UserUuid,
};

/// Checkout request as submitted by the customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub delivery_island: Option<String>,
    pub delivery_atoll: Option<String>,
    pub payment_method: PaymentMethod,
}

impl Checkout {
    #[must_use]
    pub const fn pickup(payment_method: PaymentMethod) -> Self {
        Self {
            delivery_type: DeliveryType::Pickup,
            delivery_address: None,
            delivery_island: None,
            delivery_atoll: None,
            payment_method,
        }
    }
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub customer: UserUuid,
    pub shop: ShopUuid,
    pub subtotal: u64,
    pub tax: u64,
    pub delivery: u64,
    pub total: u64,
    pub fulfilment: Fulfilment,
    pub payment_method: PaymentMethod,
}
