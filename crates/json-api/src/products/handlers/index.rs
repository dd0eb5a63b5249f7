//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, products::get::ProductResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The shop's live products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the products of a shop, including unavailable and out of stock ones.
#[endpoint(
    tags("products"),
    summary = "List Shop Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products(shop.into_inner().into())
        .await?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use petmart_app::domain::{
        products::{ProductsServiceError, records::ProductUuid},
        shops::records::ShopUuid,
    };

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            TEST_CUSTOMER,
            mocks,
            Router::with_path("shops/{shop}/products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_shop_products() -> TestResult {
        let shop = ShopUuid::new();
        let products = vec![
            make_product(ProductUuid::new(), shop),
            make_product(ProductUuid::new(), shop),
        ];

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(move |requested| *requested == shop)
            .return_once(move |_| Ok(products));

        let mut res = TestClient::get(format!("http://example.com/shops/{shop}/products"))
            .send(&make_service(mocks))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.products.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_failure_returns_500() -> TestResult {
        let shop = ShopUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx_error())));

        let res = TestClient::get(format!("http://example.com/shops/{shop}/products"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    fn sqlx_error() -> sqlx::Error {
        sqlx::Error::PoolTimedOut
    }
}
