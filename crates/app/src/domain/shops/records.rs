//! Shop Records

use jiff::Timestamp;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Shop UUID
pub type ShopUuid = TypedUuid<ShopRecord>;

/// Bank account shown to customers paying by transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
}

/// One row of a shop's delivery fee table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryZone {
    pub area: String,
    pub fee: u64,
}

impl DeliveryZone {
    #[must_use]
    pub fn new(area: impl Into<String>, fee: u64) -> Self {
        Self {
            area: area.into(),
            fee,
        }
    }
}

/// Shop Record
#[derive(Debug, Clone)]
pub struct ShopRecord {
    pub uuid: ShopUuid,
    pub owner: UserUuid,
    pub name: String,
    pub is_active: bool,
    pub bank: BankDetails,
    pub delivery_zones: Vec<DeliveryZone>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
