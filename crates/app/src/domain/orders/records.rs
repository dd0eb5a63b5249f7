//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        orders::status::{Milestone, OrderStatus, PaymentStatus},
        products::records::ProductUuid,
        shops::{delivery::Fulfilment, records::ShopUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    BankTransfer,
    CashOnDelivery,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "BANK_TRANSFER",
            Self::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "CASH_ON_DELIVERY" => Ok(Self::CashOnDelivery),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Milestone timestamps. Each is set once, when the order first reaches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeline {
    pub confirmed_at: Option<Timestamp>,
    pub preparing_at: Option<Timestamp>,
    pub ready_at: Option<Timestamp>,
    pub out_for_delivery_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub picked_up_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
}

impl Timeline {
    #[must_use]
    pub const fn get(&self, milestone: Milestone) -> Option<Timestamp> {
        match milestone {
            Milestone::Confirmed => self.confirmed_at,
            Milestone::Preparing => self.preparing_at,
            Milestone::Ready => self.ready_at,
            Milestone::OutForDelivery => self.out_for_delivery_at,
            Milestone::Delivered => self.delivered_at,
            Milestone::PickedUp => self.picked_up_at,
            Milestone::Cancelled => self.cancelled_at,
        }
    }

    /// Reached milestones, in lifecycle order.
    pub fn reached(&self) -> impl Iterator<Item = (Milestone, Timestamp)> + '_ {
        Milestone::ALL
            .into_iter()
            .filter_map(|milestone| self.get(milestone).map(|at| (milestone, at)))
    }
}

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
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
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub receipt_url: Option<String>,
    /// Where the current receipt file lives in [`ReceiptStorage`](super::receipts::ReceiptStorage).
    pub receipt_key: Option<String>,
    pub receipt_uploaded_at: Option<Timestamp>,
    pub payment_verified_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub timeline: Timeline,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
///
/// `price` and `product_name` are copied from the product at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order: OrderUuid,
    pub product: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub price: u64,
    pub created_at: Timestamp,
}

impl OrderItemRecord {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}
