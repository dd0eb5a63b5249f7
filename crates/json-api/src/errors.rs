//! API Errors
//!
//! Every handler failure is rendered as
//! `{"error": {"code": "INSUFFICIENT_STOCK", "message": "..."}}` with a status
//! derived from the code.

use std::fmt;

use salvo::{
    http::StatusCode,
    oapi::{self, Components, Content, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response, Scribe},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ErrorCode {
    ValidationError,
    NotFound,
    EmptyCart,
    MultiShop,
    InsufficientStock,
    ProductUnavailable,
    OutOfStock,
    ShopInactive,
    InvalidTransition,
    InvalidPaymentTransition,
    ReceiptRequired,
    ReceiptLocked,
    Forbidden,
    Unauthorized,
    Conflict,
    InternalError,
}

impl ErrorCode {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::EmptyCart => "EMPTY_CART",
            Self::MultiShop => "MULTI_SHOP",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::ProductUnavailable => "PRODUCT_UNAVAILABLE",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::ShopInactive => "SHOP_INACTIVE",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InvalidPaymentTransition => "INVALID_PAYMENT_TRANSITION",
            Self::ReceiptRequired => "RECEIPT_REQUIRED",
            Self::ReceiptLocked => "RECEIPT_LOCKED",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub(crate) const fn http_status(self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::EmptyCart
            | Self::MultiShop
            | Self::InsufficientStock
            | Self::ProductUnavailable
            | Self::OutOfStock
            | Self::ShopInactive
            | Self::ReceiptRequired => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidTransition
            | Self::InvalidPaymentTransition
            | Self::ReceiptLocked
            | Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub(crate) struct ApiError {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
}

impl ApiError {
    pub(crate) fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Internal failures never echo their source to the client.
    pub(crate) fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "Internal Server Error")
    }

    pub(crate) const fn status(&self) -> StatusCode {
        self.code.http_status()
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error code and human readable message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(error: ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: error.code,
                message: error.message,
            },
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status());
        res.render(Json(ErrorResponse::from(self)));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Validation or checkout precondition failed"),
            (StatusCode::UNAUTHORIZED, "Missing or invalid API token"),
            (StatusCode::FORBIDDEN, "Caller may not perform this operation"),
            (StatusCode::NOT_FOUND, "Resource not found"),
            (StatusCode::CONFLICT, "Request conflicts with the current state"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description).add_content(
                    "application/json",
                    Content::new(ErrorResponse::to_schema(components)),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn fails() -> Result<&'static str, ApiError> {
        Err(ApiError::new(
            ErrorCode::InsufficientStock,
            "only 1 of 'Cat food' in stock, 2 requested",
        ))
    }

    #[tokio::test]
    async fn renders_code_and_message_with_mapped_status() -> TestResult {
        let service = Service::new(Router::new().get(fails));

        let mut res = TestClient::get("http://example.com").send(&service).await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error.code, ErrorCode::InsufficientStock);
        assert_eq!(
            body.error.message,
            "only 1 of 'Cat food' in stock, 2 requested"
        );

        Ok(())
    }

    #[test]
    fn state_conflicts_map_to_409() {
        for code in [
            ErrorCode::InvalidTransition,
            ErrorCode::InvalidPaymentTransition,
            ErrorCode::ReceiptLocked,
        ] {
            assert_eq!(code.http_status(), StatusCode::CONFLICT, "{code}");
        }
    }

    #[test]
    fn serialized_code_matches_display() -> TestResult {
        let json = serde_json::to_string(&ErrorCode::InvalidPaymentTransition)?;

        assert_eq!(json, "\"INVALID_PAYMENT_TRANSITION\"");

        Ok(())
    }
}
