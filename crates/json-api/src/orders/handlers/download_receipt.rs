//! Download Receipt Handler

use std::sync::Arc;

use salvo::{
    http::header::{CONTENT_TYPE, HeaderValue},
    oapi::extract::PathParam,
    prelude::*,
};
use uuid::Uuid;

use petmart_app::domain::orders::records::OrderUuid;

use crate::{errors::ApiError, extensions::*, state::State};

/// Download Receipt Handler
///
/// Streams the stored receipt back to the order's customer or the shop's
/// seller. Other callers get the same answer as for the order itself.
#[endpoint(
    tags("orders"),
    summary = "Download Payment Receipt",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let order = OrderUuid::from(order.into_inner());

    let receipt = state.app.orders.get_receipt(actor, order).await?;

    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static(receipt.content_type.mime()),
    );
    res.body(receipt.bytes);

    Ok(())
}
