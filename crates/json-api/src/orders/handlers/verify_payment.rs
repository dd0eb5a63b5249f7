//! Verify Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, orders::get::OrderResponse, state::State};

/// Verify Payment Handler
///
/// Confirms the uploaded bank transfer receipt. The order must have a receipt
/// and its payment must still be pending.
#[endpoint(
    tags("orders"),
    summary = "Verify Payment",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let order = state
        .app
        .orders
        .verify_payment(actor, order.into_inner().into())
        .await?;

    info!(order = %order.uuid, "payment verified");

    Ok(Json(order.into()))
}
