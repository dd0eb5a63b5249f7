//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{errors::ApiError, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart emptied"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    state.app.carts.clear(actor).await?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, service_as};

    use super::*;

    #[tokio::test]
    async fn test_clear_cart_returns_204() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_clear()
            .once()
            .withf(|actor| *actor == TEST_CUSTOMER)
            .return_once(|_| Ok(3));

        let service = service_as(TEST_CUSTOMER, mocks, Router::with_path("cart").delete(handler));

        let res = TestClient::delete("http://example.com/cart")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
