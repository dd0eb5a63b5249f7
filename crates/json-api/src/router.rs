//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products, shops};

/// Routes that require a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::add_item::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::update_item::handler)
                                .delete(carts::remove_item::handler),
                        ),
                ),
        )
        .push(Router::with_path("checkout").post(orders::checkout::handler))
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").put(orders::status::handler))
                        .push(
                            Router::with_path("payment")
                                .push(
                                    Router::with_path("verify")
                                        .post(orders::verify_payment::handler),
                                )
                                .push(Router::with_path("paid").post(orders::mark_paid::handler)),
                        )
                        .push(
                            Router::with_path("receipt")
                                .get(orders::download_receipt::handler)
                                .post(orders::receipt::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("shops")
                .post(shops::create::handler)
                .push(
                    Router::with_path("{shop}")
                        .get(shops::get::handler)
                        .put(shops::update::handler)
                        .push(
                            Router::with_path("delivery-zones")
                                .put(shops::delivery_zones::handler),
                        )
                        .push(Router::with_path("orders").get(orders::shop_index::handler))
                        .push(
                            Router::with_path("products")
                                .get(products::index::handler)
                                .post(products::create::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("products").push(
                Router::with_path("{product}")
                    .get(products::get::handler)
                    .put(products::update::handler)
                    .delete(products::delete::handler),
            ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        Service,
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        test::TestClient,
    };
    use testresult::TestResult;

    use petmart_app::auth::AuthServiceError;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_every_route_requires_a_token() -> TestResult {
        for (method, path) in [
            ("GET", "/cart"),
            ("POST", "/checkout"),
            ("GET", "/orders"),
            ("POST", "/shops"),
        ] {
            let request = match method {
                "GET" => TestClient::get(format!("http://example.com{path}")),
                _ => TestClient::post(format!("http://example.com{path}")),
            };

            let res = request.send(&make_service(Mocks::default())).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} {path}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_token_never_reaches_handlers() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::UnknownToken));

        let res = TestClient::get("http://example.com/orders")
            .add_header(AUTHORIZATION, "Bearer pm_unknown", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
