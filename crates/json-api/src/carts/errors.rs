//! Cart Errors

use tracing::error;

use petmart_app::domain::carts::CartsServiceError;

use crate::errors::{ApiError, ErrorCode};

impl From<CartsServiceError> for ApiError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::AlreadyExists => Self::conflict("Cart item already exists"),
            CartsServiceError::NotFound => Self::not_found("Cart item or product not found"),
            CartsServiceError::Forbidden => Self::forbidden("Only customers have carts"),
            CartsServiceError::Validation(message) => Self::validation(message),
            error @ CartsServiceError::OutOfStock { .. } => {
                Self::new(ErrorCode::OutOfStock, error.to_string())
            }
            CartsServiceError::InvalidReference => Self::not_found("Product not found"),
            CartsServiceError::InvalidData => Self::validation("Invalid cart payload"),
            CartsServiceError::Sql(source) => {
                error!("cart storage failed: {source}");

                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use petmart_app::domain::products::records::ProductUuid;

    use super::*;

    #[test]
    fn out_of_stock_reports_availability() {
        let error = ApiError::from(CartsServiceError::OutOfStock {
            product: ProductUuid::new(),
            requested: 6,
            available: 5,
        });

        assert_eq!(error.code, ErrorCode::OutOfStock);
        assert!(error.message.contains("only 5"), "{}", error.message);
    }
}
