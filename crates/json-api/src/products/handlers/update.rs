//! Update Product Handler

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

use petmart_app::domain::products::data::ProductUpdate;

use crate::{errors::ApiError, extensions::*, products::get::ProductResponse, state::State};

/// Update Product Request
///
/// Replaces every mutable field of the product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub is_available: bool,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            price: request.price,
            stock: request.stock,
            is_available: request.is_available,
        }
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let product = product.into_inner();

    tracing::Span::current().record("product_uuid", tracing::field::display(product));

    let updated = state
        .app
        .products
        .update_product(actor, product.into(), json.into_inner().into())
        .await?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use petmart_app::domain::{
        products::{ProductsServiceError, records::ProductUuid},
        shops::records::ShopUuid,
    };

    use crate::test_helpers::{Mocks, TEST_SELLER, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            TEST_SELLER,
            mocks,
            Router::with_path("products/{product}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_product_returns_new_values() -> TestResult {
        let uuid = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .withf(move |actor, product, update| {
                *actor == TEST_SELLER
                    && *product == uuid
                    && *update
                        == ProductUpdate {
                            name: "Cat food".to_string(),
                            price: 120_00,
                            stock: 0,
                            is_available: false,
                        }
            })
            .return_once(move |_, _, update| {
                let mut product = make_product(uuid, ShopUuid::new());
                product.price = update.price;
                product.stock = update.stock;
                product.is_available = update.is_available;

                Ok(product)
            });

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({
                "name": "Cat food",
                "price": 12000,
                "stock": 0,
                "is_available": false
            }))
            .send(&make_service(mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price.amount, "120.00");
        assert!(!body.is_available, "product should be unlisted");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({
                "name": "Cat food",
                "price": 12000,
                "stock": 1,
                "is_available": true
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
