//! Delivery Zone Resolver

use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::warn;

use crate::domain::shops::records::DeliveryZone;

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

impl DeliveryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "PICKUP",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery type: {0}")]
pub struct UnknownDeliveryType(pub String);

impl FromStr for DeliveryType {
    type Err = UnknownDeliveryType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PICKUP" => Ok(Self::Pickup),
            "DELIVERY" => Ok(Self::Delivery),
            other => Err(UnknownDeliveryType(other.to_string())),
        }
    }
}

/// Destination for a delivered order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAddress {
    pub address: String,
    pub island: String,
    pub atoll: String,
}

/// Pickup from the shop, or delivery to an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfilment {
    Pickup,
    Delivery(DeliveryAddress),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FulfilmentError {
    #[error("delivery orders require {0}")]
    MissingField(&'static str),
}

impl Fulfilment {
    /// Build a fulfilment from the loose checkout fields.
    ///
    /// Address fields are ignored for pickup.
    ///
    /// # Errors
    ///
    /// Returns [`FulfilmentError::MissingField`] naming the first blank or
    /// absent address field of a delivery order.
    pub fn from_parts(
        delivery_type: DeliveryType,
        address: Option<String>,
        island: Option<String>,
        atoll: Option<String>,
    ) -> Result<Self, FulfilmentError> {
        match delivery_type {
            DeliveryType::Pickup => Ok(Self::Pickup),
            DeliveryType::Delivery => Ok(Self::Delivery(DeliveryAddress {
                address: required(address, "delivery_address")?,
                island: required(island, "delivery_island")?,
                atoll: required(atoll, "delivery_atoll")?,
            })),
        }
    }

    #[must_use]
    pub const fn delivery_type(&self) -> DeliveryType {
        match self {
            Self::Pickup => DeliveryType::Pickup,
            Self::Delivery(_) => DeliveryType::Delivery,
        }
    }

    #[must_use]
    pub const fn address(&self) -> Option<&DeliveryAddress> {
        match self {
            Self::Pickup => None,
            Self::Delivery(address) => Some(address),
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, FulfilmentError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(FulfilmentError::MissingField(field))
}

/// Delivery fee for a fulfilment, looked up by destination island.
///
/// The first zone whose `area` equals the island exactly wins. Pickup is free,
/// and so is a destination the shop has no zone for.
#[must_use]
pub fn delivery_fee(zones: &[DeliveryZone], fulfilment: &Fulfilment) -> u64 {
    let Fulfilment::Delivery(address) = fulfilment else {
        return 0;
    };

    if let Some(zone) = zones.iter().find(|zone| zone.area == address.island) {
        return zone.fee;
    }

    warn!(
        island = %address.island,
        zones = zones.len(),
        "no delivery zone matched destination, charging no delivery fee"
    );

    0
}
