//! Pricing & Tax
//!
//! Order totals are computed once, at checkout, from the live product prices
//! and the shop's delivery fee. All amounts are minor units (laari).

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors raised while pricing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A line total or the order total did not fit in the amount type.
    #[error("amount overflowed while pricing order")]
    Overflow,

    /// The tax calculation could not be represented.
    #[error("tax calculation overflowed or was not finite")]
    TaxConversion,
}

/// A single priced line: unit price in minor units and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: u64,
    pub quantity: u32,
}

impl PricedLine {
    #[must_use]
    pub const fn new(unit_price: u64, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }
}

/// Monetary breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quote {
    pub subtotal: u64,
    pub tax: u64,
    pub delivery: u64,
    pub total: u64,
}

/// Tax policy applied at checkout.
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    tax_rate: Percentage,
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(Percentage::from(Decimal::new(8, 2)))
    }
}

impl Pricing {
    #[must_use]
    pub const fn new(tax_rate: Percentage) -> Self {
        Self { tax_rate }
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Price a set of lines plus a flat delivery fee.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: a line or running total exceeded `u64`.
    /// - [`PricingError::TaxConversion`]: the tax amount could not be represented.
    pub fn quote(&self, lines: &[PricedLine], delivery: u64) -> Result<Quote, PricingError> {
        let subtotal = subtotal(lines)?;
        let tax = tax_of_minor(&self.tax_rate, subtotal)?;

        let total = subtotal
            .checked_add(tax)
            .and_then(|amount| amount.checked_add(delivery))
            .ok_or(PricingError::Overflow)?;

        Ok(Quote {
            subtotal,
            tax,
            delivery,
            total,
        })
    }
}

/// Sum of `unit_price × quantity` across all lines.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum does not fit in `u64`.
pub fn subtotal(lines: &[PricedLine]) -> Result<u64, PricingError> {
    lines.iter().try_fold(0_u64, |acc, line| {
        line.unit_price
            .checked_mul(u64::from(line.quantity))
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or(PricingError::Overflow)
    })
}

/// Apply a percentage to a minor-unit amount, rounding half away from zero once.
///
/// # Errors
///
/// Returns [`PricingError::TaxConversion`] if the result cannot be represented.
pub fn tax_of_minor(rate: &Percentage, minor: u64) -> Result<u64, PricingError> {
    let minor = Decimal::from_u64(minor).ok_or(PricingError::TaxConversion)?;

    ((*rate) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::TaxConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::TaxConversion)
}
