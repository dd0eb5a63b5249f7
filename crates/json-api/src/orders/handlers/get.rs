//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petmart_app::domain::{
    orders::records::{OrderItemRecord, OrderRecord},
    shops::delivery::DeliveryAddress,
};

use crate::{errors::ApiError, extensions::*, money::AmountResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product: Uuid,

    /// Product name at the time of checkout
    pub product_name: String,

    pub quantity: u32,

    /// Unit price paid
    pub price: AmountResponse,

    pub line_total: AmountResponse,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product: item.product.into_uuid(),
            line_total: item.line_total().into(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryAddressResponse {
    pub address: String,
    pub island: String,
    pub atoll: String,
}

impl From<&DeliveryAddress> for DeliveryAddressResponse {
    fn from(address: &DeliveryAddress) -> Self {
        Self {
            address: address.address.clone(),
            island: address.island.clone(),
            atoll: address.atoll.clone(),
        }
    }
}

/// A status milestone the order has reached.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TimelineEntry {
    /// One of `confirmed`, `preparing`, `ready`, `out_for_delivery`,
    /// `delivered`, `picked_up`, `cancelled`
    pub milestone: String,

    pub at: String,
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human readable order number, e.g. `PM-20260301120000123-K3X9Q2`
    pub order_number: String,

    pub customer: Uuid,
    pub shop: Uuid,
    pub status: String,
    pub payment_method: String,
    pub payment_status: String,

    /// `PICKUP` or `DELIVERY`
    pub delivery_type: String,

    pub delivery_address: Option<DeliveryAddressResponse>,
    pub subtotal: AmountResponse,
    pub tax: AmountResponse,
    pub delivery: AmountResponse,
    pub total: AmountResponse,
    pub receipt_url: Option<String>,
    pub receipt_uploaded_at: Option<String>,
    pub payment_verified_at: Option<String>,
    pub paid_at: Option<String>,

    /// Reached milestones in lifecycle order
    pub timeline: Vec<TimelineEntry>,

    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer: order.customer.into_uuid(),
            shop: order.shop.into_uuid(),
            status: order.status.to_string(),
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            delivery_type: order.fulfilment.delivery_type().to_string(),
            delivery_address: order.fulfilment.address().map(Into::into),
            subtotal: order.subtotal.into(),
            tax: order.tax.into(),
            delivery: order.delivery.into(),
            total: order.total.into(),
            receipt_uploaded_at: order.receipt_uploaded_at.map(|at| at.to_string()),
            payment_verified_at: order.payment_verified_at.map(|at| at.to_string()),
            paid_at: order.paid_at.map(|at| at.to_string()),
            timeline: order
                .timeline
                .reached()
                .map(|(milestone, at)| TimelineEntry {
                    milestone: milestone.as_str().to_string(),
                    at: at.to_string(),
                })
                .collect(),
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            order_number: order.order_number,
            receipt_url: order.receipt_url,
        }
    }
}

/// Get Order Handler
///
/// Visible to the ordering customer, the shop's seller and admins.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order with items and timeline"),
    ),
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
        .get_order(actor, order.into_inner().into())
        .await?;

    Ok(Json(order.into()))
}
