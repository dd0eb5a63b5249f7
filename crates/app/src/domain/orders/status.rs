//! Order Status Machine
//!
//! Fulfilment status and payment status are independent. Each has a closed
//! set of states and one table of legal moves.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::domain::orders::records::PaymentMethod;

/// Fulfilment status of an order, driven by the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    PickedUp,
    Cancelled,
}

/// A status milestone with its own write-once timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    PickedUp,
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::ReadyForPickup,
        Self::OutForDelivery,
        Self::Delivered,
        Self::PickedUp,
        Self::Cancelled,
    ];

    /// States reachable from this one in a single step.
    #[must_use]
    pub const fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::ReadyForPickup, Self::OutForDelivery],
            Self::ReadyForPickup => &[Self::PickedUp],
            Self::OutForDelivery => &[Self::Delivered],
            Self::Delivered | Self::PickedUp | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Milestone stamped when an order enters this status.
    #[must_use]
    pub const fn milestone(self) -> Option<Milestone> {
        match self {
            Self::Pending => None,
            Self::Confirmed => Some(Milestone::Confirmed),
            Self::Preparing => Some(Milestone::Preparing),
            Self::ReadyForPickup => Some(Milestone::Ready),
            Self::OutForDelivery => Some(Milestone::OutForDelivery),
            Self::Delivered => Some(Milestone::Delivered),
            Self::PickedUp => Some(Milestone::PickedUp),
            Self::Cancelled => Some(Milestone::Cancelled),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::PickedUp => "PICKED_UP",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl Milestone {
    pub const ALL: [Self; 7] = [
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::OutForDelivery,
        Self::Delivered,
        Self::PickedUp,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::PickedUp => "picked_up",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Payment status of an order, driven by the seller after a receipt arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Verified,
    Paid,
}

impl PaymentStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Verified, Self::Paid];

    /// Whether payment may move to `next` for an order paid by `method`.
    ///
    /// Cash on delivery has no receipt to verify, so it may go straight to paid.
    #[must_use]
    pub const fn can_transition_to(self, next: Self, method: PaymentMethod) -> bool {
        match (self, next) {
            (Self::Pending, Self::Verified) | (Self::Verified, Self::Paid) => true,
            (Self::Pending, Self::Paid) => matches!(method, PaymentMethod::CashOnDelivery),
            _ => false,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}
