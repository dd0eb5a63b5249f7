//! Update Shop Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::domain::shops::data::ShopUpdate;

use crate::{
    errors::ApiError,
    extensions::*,
    shops::get::{BankDetailsBody, ShopResponse},
    state::State,
};

/// Update Shop Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateShopRequest {
    pub name: String,
    pub is_active: bool,
    pub bank: BankDetailsBody,
}

impl From<UpdateShopRequest> for ShopUpdate {
    fn from(request: UpdateShopRequest) -> Self {
        ShopUpdate {
            name: request.name,
            is_active: request.is_active,
            bank: request.bank.into(),
        }
    }
}

/// Update Shop Handler
#[endpoint(
    tags("shops"),
    summary = "Update Shop",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Shop updated"),
    ),
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    json: JsonBody<UpdateShopRequest>,
    depot: &mut Depot,
) -> Result<Json<ShopResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let shop = state
        .app
        .shops
        .update_shop(actor, shop.into_inner().into(), json.into_inner().into())
        .await?;

    Ok(Json(shop.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use petmart_app::domain::shops::{ShopsServiceError, records::ShopUuid};

    use crate::test_helpers::{Mocks, TEST_SELLER, make_shop, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            TEST_SELLER,
            mocks,
            Router::with_path("shops/{shop}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_deactivating_shop_returns_updated_record() -> TestResult {
        let uuid = ShopUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_update_shop()
            .once()
            .withf(move |_, shop, update| *shop == uuid && !update.is_active)
            .return_once(move |_, _, update| {
                let mut shop = make_shop(uuid, TEST_SELLER.user);
                shop.is_active = update.is_active;

                Ok(shop)
            });

        let mut res = TestClient::put(format!("http://example.com/shops/{uuid}"))
            .json(&json!({ "name": "Paws", "is_active": false, "bank": {} }))
            .send(&make_service(mocks))
            .await;

        let body: ShopResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.is_active, "shop should be inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_name_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_update_shop()
            .once()
            .return_once(|_, _, _| Err(ShopsServiceError::Validation("name is required".into())));

        let res = TestClient::put(format!("http://example.com/shops/{}", ShopUuid::new()))
            .json(&json!({ "name": " ", "is_active": true, "bank": {} }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
