//! Shops

pub mod data;
pub mod delivery;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ShopsServiceError;
pub use service::*;
