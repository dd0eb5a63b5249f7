//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{Span, field, info};
use uuid::Uuid;

use petmart_app::domain::{
    orders::{
        data::Checkout,
        records::{OrderRecord, PaymentMethod},
    },
    shops::delivery::DeliveryType,
    users::records::Identity,
};

use crate::{
    errors::ApiError,
    extensions::*,
    money::AmountResponse,
    observability::{CheckoutOutcome, record_checkout},
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    /// `DELIVERY` or `PICKUP`
    pub delivery_type: String,

    /// Street address, required for delivery
    pub delivery_address: Option<String>,

    /// Destination island, required for delivery and used to look up the fee
    pub delivery_island: Option<String>,

    /// Destination atoll, required for delivery
    pub delivery_atoll: Option<String>,

    /// `BANK_TRANSFER` or `CASH_ON_DELIVERY`
    pub payment_method: String,
}

impl TryFrom<CheckoutRequest> for Checkout {
    type Error = ApiError;

    fn try_from(request: CheckoutRequest) -> Result<Self, Self::Error> {
        Ok(Checkout {
            delivery_type: request
                .delivery_type
                .parse::<DeliveryType>()
                .map_err(|error| ApiError::validation(error.to_string()))?,
            delivery_address: request.delivery_address,
            delivery_island: request.delivery_island,
            delivery_atoll: request.delivery_atoll,
            payment_method: request
                .payment_method
                .parse::<PaymentMethod>()
                .map_err(|error| ApiError::validation(error.to_string()))?,
        })
    }
}

/// Order Placed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    pub order_uuid: Uuid,
    pub order_number: String,
    pub total: AmountResponse,
}

/// Checkout Handler
///
/// Converts the caller's cart into a single order in one transaction: stock is
/// decremented, prices are snapshotted and the cart is emptied.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip(json, depot, res),
    fields(order_uuid = field::Empty, order_number = field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let placed = place_order(state, actor, json.into_inner()).await;

    record_checkout(match &placed {
        Ok(_) => CheckoutOutcome::Placed,
        Err(error) if error.status().is_server_error() => CheckoutOutcome::Failed,
        Err(_) => CheckoutOutcome::Rejected,
    });

    let order = placed?;

    let span = Span::current();
    span.record("order_uuid", field::display(order.uuid));
    span.record("order_number", order.order_number.as_str());

    info!(total = order.total, shop = %order.shop, "order placed");

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CheckoutResponse {
        order_uuid: order.uuid.into_uuid(),
        total: order.total.into(),
        order_number: order.order_number,
    }))
}

async fn place_order(
    state: &State,
    actor: Identity,
    request: CheckoutRequest,
) -> Result<OrderRecord, ApiError> {
    let checkout = Checkout::try_from(request)?;

    Ok(state.app.orders.checkout(actor, checkout).await?)
}
