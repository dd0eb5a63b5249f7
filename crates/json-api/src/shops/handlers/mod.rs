//! Shop Handlers

pub(crate) mod create;
pub(crate) mod delivery_zones;
pub(crate) mod get;
pub(crate) mod update;
