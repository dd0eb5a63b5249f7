//! Product Errors

use tracing::error;

use petmart_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

impl From<ProductsServiceError> for ApiError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::AlreadyExists => Self::conflict("Product already exists"),
            ProductsServiceError::NotFound => Self::not_found("Product not found"),
            ProductsServiceError::Forbidden => {
                Self::forbidden("Only the shop's seller may manage its products")
            }
            ProductsServiceError::Validation(message) => Self::validation(message),
            ProductsServiceError::InvalidReference => Self::not_found("Shop not found"),
            ProductsServiceError::MissingRequiredData | ProductsServiceError::InvalidData => {
                Self::validation("Invalid product payload")
            }
            ProductsServiceError::Sql(source) => {
                error!("product storage failed: {source}");

                Self::internal()
            }
            ProductsServiceError::InvalidPrice(source) => {
                error!("stored product price is invalid: {source}");

                Self::internal()
            }
        }
    }
}
