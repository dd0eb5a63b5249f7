//! Order Handlers

pub(crate) mod checkout;
pub(crate) mod download_receipt;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod mark_paid;
pub(crate) mod receipt;
pub(crate) mod shop_index;
pub(crate) mod status;
pub(crate) mod verify_payment;
