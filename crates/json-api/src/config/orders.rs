//! Checkout & Receipt Config

use std::path::PathBuf;

use clap::Args;
use decimal_percentage::Percentage;
use petmart_app::{
    domain::orders::receipts::{DEFAULT_MAX_RECEIPT_BYTES, ReceiptPolicy},
    pricing::Pricing,
};
use rust_decimal::Decimal;

/// Pricing settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Tax rate applied to order subtotals, as a fraction (0.08 is 8%)
    #[arg(long, env = "TAX_RATE", default_value = "0.08", value_parser = parse_tax_rate)]
    pub tax_rate: Decimal,
}

impl PricingConfig {
    /// Pricing policy for the order service.
    #[must_use]
    pub fn pricing(&self) -> Pricing {
        Pricing::new(Percentage::from(self.tax_rate))
    }
}

fn parse_tax_rate(raw: &str) -> Result<Decimal, String> {
    let rate: Decimal = raw
        .trim()
        .parse()
        .map_err(|error| format!("invalid tax rate '{raw}': {error}"))?;

    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(format!("tax rate must be between 0 and 1, got {rate}"));
    }

    Ok(rate)
}

/// Receipt storage settings.
#[derive(Debug, Args)]
pub struct ReceiptsConfig {
    /// Directory uploaded receipts are written to. Never served directly.
    #[arg(long, env = "RECEIPTS_DIR", default_value = "./storage/receipts")]
    pub receipts_dir: PathBuf,

    /// Largest accepted receipt upload, in bytes
    #[arg(long, env = "RECEIPTS_MAX_BYTES", default_value_t = DEFAULT_MAX_RECEIPT_BYTES)]
    pub receipts_max_bytes: usize,
}

impl ReceiptsConfig {
    #[must_use]
    pub fn policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            max_bytes: self.receipts_max_bytes,
        }
    }
}
