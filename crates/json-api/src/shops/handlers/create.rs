//! Create Shop Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::domain::shops::{data::NewShop, records::ShopUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    shops::get::{BankDetailsBody, ShopResponse},
    state::State,
};

/// Create Shop Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateShopRequest {
    pub name: String,

    /// Owning seller, admins only. Defaults to the caller.
    pub owner: Option<Uuid>,

    #[serde(default)]
    pub bank: BankDetailsBody,
}

/// Create Shop Handler
#[endpoint(
    tags("shops"),
    summary = "Create Shop",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Shop created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateShopRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ShopResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let request = json.into_inner();

    let shop = state
        .app
        .shops
        .create_shop(
            actor,
            NewShop {
                uuid: ShopUuid::new(),
                owner: request.owner.map_or(actor.user, Into::into),
                name: request.name,
                bank: request.bank.into(),
            },
        )
        .await?;

    res.add_header(LOCATION, format!("/shops/{}", shop.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(shop.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use petmart_app::domain::shops::ShopsServiceError;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, TEST_SELLER, make_shop, service_as};

    use super::*;

    #[tokio::test]
    async fn test_create_shop_defaults_owner_to_caller() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_create_shop()
            .once()
            .withf(|actor, new| {
                *actor == TEST_SELLER
                    && new.owner == TEST_SELLER.user
                    && new.name == "Paws"
                    && new.bank.bank_name.as_deref() == Some("Bank of Maldives")
            })
            .return_once(|_, new| Ok(make_shop(new.uuid, new.owner)));

        let service = service_as(
            TEST_SELLER,
            mocks,
            Router::with_path("shops").post(handler),
        );

        let mut res = TestClient::post("http://example.com/shops")
            .json(&json!({ "name": "Paws", "bank": { "bank_name": "Bank of Maldives" } }))
            .send(&service)
            .await;

        let body: ShopResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.owner, TEST_SELLER.user.into_uuid());
        assert!(body.is_active, "new shops should be active");

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_create_shop() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_create_shop()
            .once()
            .return_once(|_, _| Err(ShopsServiceError::Forbidden));

        let service = service_as(
            TEST_CUSTOMER,
            mocks,
            Router::with_path("shops").post(handler),
        );

        let res = TestClient::post("http://example.com/shops")
            .json(&json!({ "name": "Paws" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
