//! Depot helper extensions.

use std::any::Any;

use petmart_app::domain::users::records::Identity;
use salvo::prelude::Depot;

use crate::errors::ApiError;

/// Helpers for reading request-scoped values out of the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: Identity);

    fn identity_or_401(&self) -> Result<Identity, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<Identity, ApiError> {
        self.obtain::<Identity>()
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }
}
