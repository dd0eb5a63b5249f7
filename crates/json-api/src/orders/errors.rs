//! Order Errors

use tracing::error;

use petmart_app::domain::orders::OrdersServiceError;

use crate::errors::{ApiError, ErrorCode};

impl From<OrdersServiceError> for ApiError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::Validation(message) => Self::validation(message),
            OrdersServiceError::NotFound => Self::not_found("Order not found"),
            OrdersServiceError::NoReceipt => Self::not_found("No receipt has been uploaded"),
            OrdersServiceError::Forbidden => {
                Self::forbidden("You may not perform this action on the order")
            }
            error @ OrdersServiceError::EmptyCart => {
                Self::new(ErrorCode::EmptyCart, error.to_string())
            }
            error @ OrdersServiceError::MultiShop => {
                Self::new(ErrorCode::MultiShop, error.to_string())
            }
            error @ OrdersServiceError::ProductUnavailable { .. } => {
                Self::new(ErrorCode::ProductUnavailable, error.to_string())
            }
            error @ OrdersServiceError::InsufficientStock { .. } => {
                Self::new(ErrorCode::InsufficientStock, error.to_string())
            }
            error @ OrdersServiceError::ShopInactive => {
                Self::new(ErrorCode::ShopInactive, error.to_string())
            }
            error @ OrdersServiceError::InvalidTransition { .. } => {
                Self::new(ErrorCode::InvalidTransition, error.to_string())
            }
            error @ OrdersServiceError::InvalidPaymentTransition { .. } => {
                Self::new(ErrorCode::InvalidPaymentTransition, error.to_string())
            }
            error @ OrdersServiceError::ReceiptRequired => {
                Self::new(ErrorCode::ReceiptRequired, error.to_string())
            }
            error @ OrdersServiceError::ReceiptLocked(_) => {
                Self::new(ErrorCode::ReceiptLocked, error.to_string())
            }
            OrdersServiceError::AlreadyExists => Self::conflict("Order already exists"),
            OrdersServiceError::InvalidReference | OrdersServiceError::InvalidData => {
                Self::validation("Invalid order data")
            }
            error @ (OrdersServiceError::OrderNumberExhausted
            | OrdersServiceError::Pricing(_)
            | OrdersServiceError::Storage(_)
            | OrdersServiceError::Sql(_)) => {
                error!(?error, "order operation failed: {error}");

                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use petmart_app::domain::{
        orders::status::{OrderStatus, PaymentStatus},
        products::records::ProductUuid,
    };
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn insufficient_stock_names_the_product() {
        let error = ApiError::from(OrdersServiceError::InsufficientStock {
            product: ProductUuid::new(),
            name: "Cat food".to_string(),
            requested: 2,
            available: 1,
        });

        assert_eq!(error.code, ErrorCode::InsufficientStock);
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert!(error.message.contains("Cat food"), "{}", error.message);
    }

    #[test]
    fn illegal_transition_is_a_conflict() {
        let error = ApiError::from(OrdersServiceError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Confirmed,
        });

        assert_eq!(error.code, ErrorCode::InvalidTransition);
        assert_eq!(error.status(), StatusCode::CONFLICT);
        assert_eq!(error.message, "cannot move order from DELIVERED to CONFIRMED");
    }

    #[test]
    fn locked_receipt_is_a_conflict() {
        let error = ApiError::from(OrdersServiceError::ReceiptLocked(PaymentStatus::Verified));

        assert_eq!(error.code, ErrorCode::ReceiptLocked);
        assert_eq!(error.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_receipt_is_not_found() {
        let error = ApiError::from(OrdersServiceError::NoReceipt);

        assert_eq!(error.code, ErrorCode::NotFound);
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_hide_details() {
        let error = ApiError::from(OrdersServiceError::OrderNumberExhausted);

        assert_eq!(error.code, ErrorCode::InternalError);
        assert!(!error.message.contains("order number"), "{}", error.message);
    }
}
