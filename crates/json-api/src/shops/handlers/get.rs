//! Get Shop Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::domain::shops::records::{BankDetails, DeliveryZone, ShopRecord};

use crate::{errors::ApiError, extensions::*, money::AmountResponse, state::State};

/// Bank account customers transfer payment to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct BankDetailsBody {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
}

impl From<BankDetails> for BankDetailsBody {
    fn from(bank: BankDetails) -> Self {
        Self {
            bank_name: bank.bank_name,
            account_name: bank.account_name,
            account_number: bank.account_number,
        }
    }
}

impl From<BankDetailsBody> for BankDetails {
    fn from(body: BankDetailsBody) -> Self {
        Self {
            bank_name: body.bank_name,
            account_name: body.account_name,
            account_number: body.account_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryZoneResponse {
    /// Island or area name, matched case-insensitively
    pub area: String,
    pub fee: AmountResponse,
}

impl From<DeliveryZone> for DeliveryZoneResponse {
    fn from(zone: DeliveryZone) -> Self {
        Self {
            area: zone.area,
            fee: zone.fee.into(),
        }
    }
}

/// Shop Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShopResponse {
    pub uuid: Uuid,
    pub owner: Uuid,
    pub name: String,

    /// Inactive shops do not accept orders
    pub is_active: bool,

    pub bank: BankDetailsBody,
    pub delivery_zones: Vec<DeliveryZoneResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ShopRecord> for ShopResponse {
    fn from(shop: ShopRecord) -> Self {
        Self {
            uuid: shop.uuid.into_uuid(),
            owner: shop.owner.into_uuid(),
            name: shop.name,
            is_active: shop.is_active,
            bank: shop.bank.into(),
            delivery_zones: shop.delivery_zones.into_iter().map(Into::into).collect(),
            created_at: shop.created_at.to_string(),
            updated_at: shop.updated_at.to_string(),
        }
    }
}

/// Get Shop Handler
#[endpoint(
    tags("shops"),
    summary = "Get Shop",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Shop found"),
    ),
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ShopResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let shop = state.app.shops.get_shop(shop.into_inner().into()).await?;

    Ok(Json(shop.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use petmart_app::domain::shops::{ShopsServiceError, records::ShopUuid};

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, TEST_SELLER, make_shop, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            TEST_CUSTOMER,
            mocks,
            Router::with_path("shops/{shop}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_shop_includes_bank_and_zones() -> TestResult {
        let uuid = ShopUuid::new();
        let shop = make_shop(uuid, TEST_SELLER.user);

        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_get_shop()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(shop));

        let mut res = TestClient::get(format!("http://example.com/shops/{uuid}"))
            .send(&make_service(mocks))
            .await;

        let body: ShopResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.bank.account_number.as_deref(), Some("7701234567001"));
        assert_eq!(body.delivery_zones.len(), 1);
        assert_eq!(
            body.delivery_zones.first().map(|zone| zone.fee.amount.as_str()),
            Some("25.00")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_shop_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .shops
            .expect_get_shop()
            .once()
            .return_once(|_| Err(ShopsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/shops/{}", ShopUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
