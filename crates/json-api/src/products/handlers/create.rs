//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{errors::ApiError, extensions::*, products::get::ProductResponse, state::State};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub name: String,

    /// Unit price in laari
    pub price: u64,

    #[serde(default)]
    pub stock: u32,

    #[serde(default = "listed")]
    pub is_available: bool,
}

const fn listed() -> bool {
    true
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
    ),
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let request = json.into_inner();

    let product = state
        .app
        .products
        .create_product(
            actor,
            NewProduct {
                uuid: ProductUuid::new(),
                shop: shop.into_inner().into(),
                name: request.name,
                price: request.price,
                stock: request.stock,
                is_available: request.is_available,
            },
        )
        .await?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use petmart_app::domain::{
        products::ProductsServiceError, shops::records::ShopUuid, users::records::Identity,
    };

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, TEST_SELLER, make_product, service_as};

    use super::*;

    fn make_service(identity: Identity, mocks: Mocks) -> Service {
        service_as(
            identity,
            mocks,
            Router::with_path("shops/{shop}/products").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_location() -> TestResult {
        let shop = ShopUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .withf(move |actor, new| {
                *actor == TEST_SELLER
                    && new.shop == shop
                    && new.name == "Cat food"
                    && new.price == 100_00
                    && new.stock == 5
                    && new.is_available
            })
            .return_once(|_, new| Ok(make_product(new.uuid, new.shop)));

        let mut res = TestClient::post(format!("http://example.com/shops/{shop}/products"))
            .json(&json!({ "name": "Cat food", "price": 10000, "stock": 5 }))
            .send(&make_service(TEST_SELLER, mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/products/{}", body.uuid).as_str()));
        assert_eq!(body.shop, shop.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_for_foreign_shop_returns_403() -> TestResult {
        let shop = ShopUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::Forbidden));

        let res = TestClient::post(format!("http://example.com/shops/{shop}/products"))
            .json(&json!({ "name": "Cat food", "price": 10000 }))
            .send(&make_service(TEST_CUSTOMER, mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_without_price_is_rejected() -> TestResult {
        let shop = ShopUuid::new();

        let res = TestClient::post(format!("http://example.com/shops/{shop}/products"))
            .json(&json!({ "name": "Cat food" }))
            .send(&make_service(TEST_SELLER, Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
