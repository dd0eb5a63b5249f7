//! Set Delivery Zones Handler

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

use petmart_app::domain::shops::records::DeliveryZone;

use crate::{errors::ApiError, extensions::*, shops::get::ShopResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryZoneRequest {
    pub area: String,

    /// Fee in laari
    pub fee: u64,
}

/// Delivery Zones Request
///
/// The zones replace the shop's existing table, in the given order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryZonesRequest {
    pub zones: Vec<DeliveryZoneRequest>,
}

/// Set Delivery Zones Handler
#[endpoint(
    tags("shops"),
    summary = "Replace Delivery Zones",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Delivery zones replaced"),
    ),
)]
pub(crate) async fn handler(
    shop: PathParam<Uuid>,
    json: JsonBody<DeliveryZonesRequest>,
    depot: &mut Depot,
) -> Result<Json<ShopResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let zones = json
        .into_inner()
        .zones
        .into_iter()
        .map(|zone| DeliveryZone::new(zone.area, zone.fee))
        .collect();

    let shop = state
        .app
        .shops
        .set_delivery_zones(actor, shop.into_inner().into(), zones)
        .await?;

    Ok(Json(shop.into()))
}
