//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use petmart_app::domain::orders::status::OrderStatus;

use crate::{errors::ApiError, extensions::*, orders::get::OrderResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// Next status, e.g. `CONFIRMED` or `OUT_FOR_DELIVERY`
    pub status: String,
}

/// Update Order Status Handler
///
/// Moves the order along the fulfilment lifecycle. Only transitions allowed
/// from the current status are accepted.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let next = json
        .into_inner()
        .status
        .parse::<OrderStatus>()
        .map_err(|error| ApiError::validation(error.to_string()))?;

    let order = state
        .app
        .orders
        .update_status(actor, order.into_inner().into(), next)
        .await?;

    info!(order = %order.uuid, status = %order.status, "order status updated");

    Ok(Json(order.into()))
}
