//! Upload Receipt Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use petmart_app::domain::orders::{receipts::ReceiptFile, records::OrderUuid};

use crate::{errors::ApiError, extensions::*, state::State};

/// Multipart field carrying the receipt file.
const RECEIPT_FIELD: &str = "receipt";

/// Content type assumed when the client sends none; it is always rejected.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReceiptResponse {
    /// Authenticated download path for the stored receipt
    pub receipt_url: String,
}

/// Upload Receipt Handler
///
/// Attaches a bank transfer receipt (JPEG, PNG, WebP or PDF) sent as the
/// multipart field `receipt`. A new upload replaces the previous one until
/// the payment is verified.
#[endpoint(
    tags("orders"),
    summary = "Upload Payment Receipt",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let order = OrderUuid::from(order.into_inner());

    let Some(part) = req.file(RECEIPT_FIELD).await else {
        return Err(ApiError::validation(format!(
            "multipart field '{RECEIPT_FIELD}' is required"
        )));
    };

    let file = ReceiptFile {
        file_name: part.name().map(ToString::to_string),
        content_type: part
            .content_type()
            .map_or_else(|| UNKNOWN_CONTENT_TYPE.to_string(), |mime| mime.to_string()),
        bytes: tokio::fs::read(part.path())
            .await
            .or_500("failed to read uploaded receipt")?,
    };

    let updated = state.app.orders.upload_receipt(actor, order, file).await?;

    let receipt_url = updated
        .receipt_url
        .ok_or("order has no receipt after upload")
        .or_500("failed to upload receipt")?;

    info!(%order, %receipt_url, "receipt attached");

    Ok(Json(ReceiptResponse { receipt_url }))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::CONTENT_TYPE,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use petmart_app::domain::orders::{OrdersServiceError, status::PaymentStatus};

    use crate::{
        errors::{ErrorCode, ErrorResponse},
        test_helpers::{Mocks, TEST_CUSTOMER, make_order, service_as},
    };

    use super::*;

    const BOUNDARY: &str = "petmart-receipt";

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nreceipt";

    fn multipart(field: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"receipt.png\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();

        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        body
    }

    async fn upload(mocks: Mocks, order: OrderUuid, body: Vec<u8>) -> Response {
        let service = service_as(
            TEST_CUSTOMER,
            mocks,
            Router::with_path("orders/{order}/receipt").post(handler),
        );

        TestClient::post(format!("http://example.com/orders/{order}/receipt"))
            .add_header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
                true,
            )
            .body(body)
            .send(&service)
            .await
    }

    #[tokio::test]
    async fn test_upload_passes_file_and_returns_url() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_upload_receipt()
            .once()
            .withf(move |actor, order, file| {
                *actor == TEST_CUSTOMER
                    && *order == uuid
                    && file.content_type == "image/png"
                    && file.bytes == PNG
            })
            .return_once(move |_, _, _| {
                let mut order = make_order(uuid);
                order.receipt_url = Some(format!("/orders/{uuid}/receipt"));
                order.receipt_key = Some(format!("orders/{uuid}/r.png"));

                Ok(order)
            });

        let mut res = upload(mocks, uuid, multipart("receipt", "image/png", PNG)).await;

        let body: ReceiptResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.receipt_url, format!("/orders/{uuid}/receipt"));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_receipt_field_returns_400() -> TestResult {
        let mut res = upload(
            Mocks::default(),
            OrderUuid::new(),
            multipart("attachment", "image/png", PNG),
        )
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.error.code, ErrorCode::ValidationError);

        Ok(())
    }

    #[tokio::test]
    async fn test_verified_payment_locks_receipt() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_upload_receipt()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::ReceiptLocked(PaymentStatus::Verified)));

        let mut res = upload(mocks, OrderUuid::new(), multipart("receipt", "image/png", PNG)).await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.error.code, ErrorCode::ReceiptLocked);

        Ok(())
    }
}
