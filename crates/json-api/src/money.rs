//! Money formatting for responses.

use rusty_money::{Money, iso};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Currency every amount is denominated in.
pub(crate) const CURRENCY: &str = "MVR";

/// An amount in minor units alongside its decimal rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AmountResponse {
    /// Amount in laari
    pub minor: u64,

    /// Amount in rufiyaa with two decimal places, e.g. `"295.00"`
    pub amount: String,

    /// ISO 4217 currency code
    pub currency: String,
}

impl From<u64> for AmountResponse {
    fn from(minor: u64) -> Self {
        Self {
            minor,
            amount: format_minor(minor),
            currency: CURRENCY.to_string(),
        }
    }
}

/// Render minor units as a two-decimal amount.
pub(crate) fn format_minor(minor: u64) -> String {
    match i64::try_from(minor) {
        Ok(minor) => Money::from_minor(minor, iso::MVR).amount().to_string(),
        Err(_) => format!("{}.{:02}", minor / 100, minor % 100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_minor(295_00), "295.00");
        assert_eq!(format_minor(5), "0.05");
        assert_eq!(format_minor(0), "0.00");
    }

    #[test]
    fn amounts_beyond_i64_still_render() {
        assert_eq!(format_minor(u64::MAX), "184467440737095516.15");
    }

    #[test]
    fn response_carries_currency() {
        let amount = AmountResponse::from(270_00);

        assert_eq!(amount.amount, "270.00");
        assert_eq!(amount.currency, "MVR");
    }
}
