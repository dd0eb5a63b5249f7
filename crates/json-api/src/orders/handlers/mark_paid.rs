//! Mark Paid Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, orders::get::OrderResponse, state::State};

/// Mark Paid Handler
///
/// Bank transfers must be verified first; cash on delivery orders may be
/// marked paid directly.
#[endpoint(
    tags("orders"),
    summary = "Mark Order Paid",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let order = state
        .app
        .orders
        .mark_paid(actor, order.into_inner().into())
        .await?;

    info!(order = %order.uuid, method = %order.payment_method, "order paid");

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use petmart_app::domain::orders::{
        OrdersServiceError,
        records::{OrderUuid, PaymentMethod},
        status::PaymentStatus,
    };

    use crate::{
        errors::{ErrorCode, ErrorResponse},
        test_helpers::{Mocks, TEST_SELLER, make_order, service_as},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            TEST_SELLER,
            mocks,
            Router::with_path("orders/{order}/payment/paid").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cash_on_delivery_is_marked_paid() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .withf(move |_, order| *order == uuid)
            .return_once(move |_, _| {
                let mut order = make_order(uuid);
                order.payment_method = PaymentMethod::CashOnDelivery;
                order.payment_status = PaymentStatus::Paid;
                order.paid_at = Some(Timestamp::UNIX_EPOCH);

                Ok(order)
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/payment/paid"))
            .send(&make_service(mocks))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.payment_status, "PAID");
        assert_eq!(body.payment_method, "CASH_ON_DELIVERY");

        Ok(())
    }

    #[tokio::test]
    async fn test_unverified_transfer_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_mark_paid()
            .once()
            .return_once(|_, _| {
                Err(OrdersServiceError::InvalidPaymentTransition {
                    from: PaymentStatus::Pending,
                    to: PaymentStatus::Paid,
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/orders/{}/payment/paid",
            OrderUuid::new()
        ))
        .send(&make_service(mocks))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.error.code, ErrorCode::InvalidPaymentTransition);

        Ok(())
    }
}
