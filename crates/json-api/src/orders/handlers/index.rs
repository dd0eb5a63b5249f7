//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, extensions::*, orders::get::OrderResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderResponse>,
}

/// Order Index Handler
///
/// Returns the caller's own orders.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let orders = state.app.orders.list_customer_orders(actor).await?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use petmart_app::domain::orders::records::OrderUuid;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, make_order, service_as};

    use super::*;

    #[tokio::test]
    async fn test_index_returns_callers_orders() -> TestResult {
        let orders = vec![make_order(OrderUuid::new()), make_order(OrderUuid::new())];

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_customer_orders()
            .once()
            .withf(|actor| *actor == TEST_CUSTOMER)
            .return_once(move |_| Ok(orders));

        let service = service_as(TEST_CUSTOMER, mocks, Router::with_path("orders").get(handler));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&service)
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.orders.len(), 2);

        Ok(())
    }
}
