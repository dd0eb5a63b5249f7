//! Shop Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, orders::index::OrdersResponse, state::State};

/// Shop Order Index Handler
///
/// Returns the orders placed with a shop the caller manages.
#[endpoint(
    tags("orders"),
    summary = "List Shop Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let orders = state
        .app
        .orders
        .list_shop_orders(actor, shop.into_inner().into())
        .await?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}
