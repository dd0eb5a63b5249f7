//! Shop Errors

use tracing::error;

use petmart_app::domain::shops::ShopsServiceError;

use crate::errors::ApiError;

impl From<ShopsServiceError> for ApiError {
    fn from(error: ShopsServiceError) -> Self {
        match error {
            ShopsServiceError::AlreadyExists => Self::conflict("Shop already exists"),
            ShopsServiceError::NotFound => Self::not_found("Shop not found"),
            ShopsServiceError::Forbidden => Self::forbidden("Only the shop's seller may manage it"),
            ShopsServiceError::Validation(message) => Self::validation(message),
            ShopsServiceError::InvalidReference => Self::validation("Shop owner does not exist"),
            ShopsServiceError::MissingRequiredData | ShopsServiceError::InvalidData => {
                Self::validation("Invalid shop payload")
            }
            ShopsServiceError::Sql(source) => {
                error!("shop storage failed: {source}");

                Self::internal()
            }
        }
    }
}
