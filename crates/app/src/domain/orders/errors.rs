//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{
        orders::{
            receipts::{ReceiptRejection, ReceiptStorageError},
            status::{OrderStatus, PaymentStatus},
        },
        products::records::ProductUuid,
    },
    pricing::PricingError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("order not found")]
    NotFound,

    #[error("actor may not access this order")]
    Forbidden,

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart contains products from more than one shop")]
    MultiShop,

    #[error("product '{name}' is no longer available")]
    ProductUnavailable { product: ProductUuid, name: String },

    #[error("only {available} of '{name}' in stock, {requested} requested")]
    InsufficientStock {
        product: ProductUuid,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("shop is not accepting orders")]
    ShopInactive,

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("cannot move payment from {from} to {to}")]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("a receipt must be uploaded before payment can be verified")]
    ReceiptRequired,

    #[error("no receipt has been uploaded for this order")]
    NoReceipt,

    #[error("receipt cannot be replaced once payment is {0}")]
    ReceiptLocked(PaymentStatus),

    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("pricing error")]
    Pricing(#[from] PricingError),

    #[error("receipt storage error")]
    Storage(#[from] ReceiptStorageError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::NotNullViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<ReceiptRejection> for OrdersServiceError {
    fn from(rejection: ReceiptRejection) -> Self {
        Self::Validation(rejection.to_string())
    }
}
