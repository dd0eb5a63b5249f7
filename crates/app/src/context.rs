//! App Context

use std::sync::Arc;

use crate::{
    auth::{AuthService, PgAuthService},
    database::Db,
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{
            OrdersService, PgOrdersService,
            receipts::{ReceiptPolicy, ReceiptStorage},
        },
        products::{PgProductsService, ProductsService},
        shops::{PgShopsService, ShopsService},
    },
    pricing::Pricing,
};

/// Checkout and receipt collaborators shared by the order service.
#[derive(Clone)]
pub struct OrderSettings {
    pub pricing: Pricing,
    pub receipts: Arc<dyn ReceiptStorage>,
    pub receipt_policy: ReceiptPolicy,
}

/// The services behind the HTTP API, all sharing one connection pool.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub shops: Arc<dyn ShopsService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    #[must_use]
    pub fn from_db(db: Db, orders: OrderSettings) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            shops: Arc::new(PgShopsService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                orders.pricing,
                orders.receipts,
                orders.receipt_policy,
            )),
        }
    }
}
