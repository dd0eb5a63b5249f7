//! Shop Data

use crate::domain::{
    shops::records::{BankDetails, ShopUuid},
    users::records::UserUuid,
};

/// New Shop Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewShop {
    pub uuid: ShopUuid,
    pub owner: UserUuid,
    pub name: String,
    pub bank: BankDetails,
}

/// Shop Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ShopUpdate {
    pub name: String,
    pub is_active: bool,
    pub bank: BankDetails,
}
