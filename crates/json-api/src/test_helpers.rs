//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use petmart_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::MockCartsService,
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid, PaymentMethod, Timeline},
            status::{OrderStatus, PaymentStatus},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        shops::{
            MockShopsService,
            delivery::Fulfilment,
            records::{BankDetails, DeliveryZone, ShopRecord, ShopUuid},
        },
        users::records::{Identity, Role, UserUuid},
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: Identity =
    Identity::new(UserUuid::from_uuid(Uuid::from_u128(1)), Role::Customer);

pub(crate) const TEST_SELLER: Identity =
    Identity::new(UserUuid::from_uuid(Uuid::from_u128(2)), Role::Seller);

/// One mock per service; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) shops: MockShopsService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            shops: Arc::new(self.shops),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
        })
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

struct InjectIdentity(Identity);

#[async_trait]
impl Handler for InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_identity(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// Serve `route` as if `identity` had authenticated.
pub(crate) fn service_as(identity: Identity, mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectIdentity(identity))
            .push(route),
    )
}

pub(crate) fn make_shop(uuid: ShopUuid, owner: UserUuid) -> ShopRecord {
    ShopRecord {
        uuid,
        owner,
        name: "Paws".to_string(),
        is_active: true,
        bank: BankDetails {
            bank_name: Some("Bank of Maldives".to_string()),
            account_name: Some("Paws Pvt Ltd".to_string()),
            account_number: Some("7701234567001".to_string()),
        },
        delivery_zones: vec![DeliveryZone::new("Male", 25_00)],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_product(uuid: ProductUuid, shop: ShopUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        shop,
        name: "Cat food".to_string(),
        price: 100_00,
        stock: 5,
        is_available: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

/// A pickup order for 2 x 100.00 and 1 x 50.00 at 8% tax.
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    let item = |name: &str, quantity, price| OrderItemRecord {
        uuid: OrderItemUuid::new(),
        order: uuid,
        product: ProductUuid::new(),
        product_name: name.to_string(),
        quantity,
        price,
        created_at: Timestamp::UNIX_EPOCH,
    };

    OrderRecord {
        uuid,
        order_number: "PM-20260301120000123-K3X9Q2".to_string(),
        customer: TEST_CUSTOMER.user,
        shop: ShopUuid::new(),
        subtotal: 250_00,
        tax: 20_00,
        delivery: 0,
        total: 270_00,
        fulfilment: Fulfilment::Pickup,
        payment_method: PaymentMethod::BankTransfer,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        receipt_url: None,
        receipt_key: None,
        receipt_uploaded_at: None,
        payment_verified_at: None,
        paid_at: None,
        timeline: Timeline::default(),
        items: vec![item("Cat food", 2, 100_00), item("Dog bed", 1, 50_00)],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
