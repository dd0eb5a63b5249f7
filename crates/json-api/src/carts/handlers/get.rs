//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::{
    domain::carts::records::CartLine,
    pricing::{self, PricingError},
};

use crate::{errors::ApiError, extensions::*, money::AmountResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// Cart item UUID
    pub uuid: Uuid,

    pub product: Uuid,
    pub product_name: String,
    pub shop: Uuid,
    pub shop_name: String,

    /// Current product price
    pub unit_price: AmountResponse,

    pub quantity: u32,

    /// Units the shop has on hand
    pub stock: u32,

    pub line_total: AmountResponse,
}

impl TryFrom<CartLine> for CartLineResponse {
    type Error = PricingError;

    fn try_from(line: CartLine) -> Result<Self, Self::Error> {
        let line_total = pricing::subtotal(&[line.priced()])?;

        Ok(Self {
            uuid: line.uuid.into_uuid(),
            product: line.product.into_uuid(),
            product_name: line.product_name,
            shop: line.shop.into_uuid(),
            shop_name: line.shop_name,
            unit_price: line.unit_price.into(),
            quantity: line.quantity,
            stock: line.stock,
            line_total: line_total.into(),
        })
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartLineResponse>,

    /// Sum of line totals before tax and delivery
    pub subtotal: AmountResponse,
}

/// Get Cart Handler
///
/// Returns the caller's cart at current prices. Lines whose product was
/// removed or unlisted are left out.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let lines = state.app.carts.list_items(actor).await?;

    let priced: Vec<_> = lines.iter().map(CartLine::priced).collect();
    let subtotal = pricing::subtotal(&priced).or_500("failed to price cart")?;

    let items = lines
        .into_iter()
        .map(CartLineResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .or_500("failed to price cart line")?;

    Ok(Json(CartResponse {
        items,
        subtotal: subtotal.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use petmart_app::domain::{carts::CartsServiceError, shops::records::ShopUuid};

    use crate::{
        carts::handlers::tests::make_line,
        errors::{ErrorCode, ErrorResponse},
        test_helpers::{Mocks, TEST_CUSTOMER, TEST_SELLER, service_as},
    };

    use super::*;

    #[tokio::test]
    async fn test_cart_subtotal_sums_lines() -> TestResult {
        let shop = ShopUuid::new();
        let lines = vec![
            make_line("Cat food", 100_00, 2, shop),
            make_line("Dog bed", 50_00, 1, shop),
        ];

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_list_items()
            .once()
            .withf(|actor| *actor == TEST_CUSTOMER)
            .return_once(move |_| Ok(lines));

        let service = service_as(TEST_CUSTOMER, mocks, Router::with_path("cart").get(handler));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&service)
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.subtotal.minor, 250_00);
        assert_eq!(
            body.items.first().map(|line| line.line_total.minor),
            Some(200_00)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_overflowing_cart_returns_500() -> TestResult {
        let lines = vec![make_line("Gold cage", u64::MAX, 2, ShopUuid::new())];

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_list_items()
            .once()
            .return_once(move |_| Ok(lines));

        let service = service_as(TEST_CUSTOMER, mocks, Router::with_path("cart").get(handler));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(body.error.code, ErrorCode::InternalError);

        Ok(())
    }

    #[tokio::test]
    async fn test_sellers_have_no_cart() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_list_items()
            .once()
            .return_once(|_| Err(CartsServiceError::Forbidden));

        let service = service_as(TEST_SELLER, mocks, Router::with_path("cart").get(handler));

        let res = TestClient::get("http://example.com/cart")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
