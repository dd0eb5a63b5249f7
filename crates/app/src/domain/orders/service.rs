//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::{FxHashMap, FxHashSet};
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::PgCartItemsRepository,
        orders::{
            data::{Checkout, NewOrder},
            errors::OrdersServiceError,
            number::generate_order_number,
            receipts::{
                ReceiptContentType, ReceiptFile, ReceiptPolicy, ReceiptStorage, StoredReceipt,
            },
            records::{OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            status::{OrderStatus, PaymentStatus},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        shops::{
            delivery::{Fulfilment, delivery_fee},
            records::{ShopRecord, ShopUuid},
            repository::PgShopsRepository,
        },
        users::records::Identity,
    },
    pricing::{PricedLine, Pricing},
};

/// Attempts at inserting an order before giving up on order-number collisions.
const ORDER_NUMBER_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    pricing: Pricing,
    receipts: Arc<dyn ReceiptStorage>,
    receipt_policy: ReceiptPolicy,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    cart_items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    shops_repository: PgShopsRepository,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("pricing", &self.pricing)
            .field("receipt_policy", &self.receipt_policy)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        pricing: Pricing,
        receipts: Arc<dyn ReceiptStorage>,
        receipt_policy: ReceiptPolicy,
    ) -> Self {
        Self {
            db,
            pricing,
            receipts,
            receipt_policy,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            shops_repository: PgShopsRepository::new(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self.items_repository.list_order_items(tx, &uuids).await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<_>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order).or_default().push(item);
        }

        for order in orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    /// Orders are visible to their customer, the shop's seller and admins.
    async fn ensure_visible(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Identity,
        order: &OrderRecord,
    ) -> Result<(), OrdersServiceError> {
        if order.customer == actor.user {
            return Ok(());
        }

        let shop = self.shops_repository.get_shop(tx, order.shop).await?;

        if !actor.may_manage(shop.owner) {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(())
    }

    /// Point the order at the stored receipt and commit.
    async fn attach_receipt(
        &self,
        mut tx: Transaction<'static, Postgres>,
        order: OrderUuid,
        key: &str,
        payment_status: PaymentStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut updated = self
            .orders_repository
            .set_receipt(&mut tx, order, &receipt_url(order), key)
            .await?
            .ok_or(OrdersServiceError::ReceiptLocked(payment_status))?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Best-effort removal of a receipt file no order points at.
    async fn discard_receipt(&self, key: &str) {
        if let Err(error) = self.receipts.delete(key).await {
            warn!(receipt_key = key, "failed to remove unreferenced receipt: {error}");
        }
    }

    /// Lock the order and check the actor manages the shop it was placed with.
    async fn lock_for_seller(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let order = self.orders_repository.lock_order(tx, order).await?;
        let shop = self.shops_repository.get_shop(tx, order.shop).await?;

        if !actor.may_manage(shop.owner) {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(order)
    }

    /// Insert the order, regenerating the order number on collision.
    async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
            if let Some(created) = self.orders_repository.create_order(tx, &order).await? {
                return Ok(created);
            }

            warn!(
                order_number = %order.order_number,
                attempt,
                "order number collision, regenerating"
            );

            order.order_number = generate_order_number(Timestamp::now());
        }

        Err(OrdersServiceError::OrderNumberExhausted)
    }

    async fn checkout_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<ShopRecord, OrdersServiceError> {
        let shop = match self.shops_repository.get_shop(tx, shop).await {
            Ok(shop) => shop,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::ShopInactive),
            Err(error) => return Err(error.into()),
        };

        if !shop.is_active {
            return Err(OrdersServiceError::ShopInactive);
        }

        Ok(shop)
    }
}

/// Receipts are downloaded through their order, never from storage directly.
fn receipt_url(order: OrderUuid) -> String {
    format!("/orders/{order}/receipt")
}

/// The shop every locked product belongs to, if there is exactly one.
fn single_shop(
    products: &FxHashMap<ProductUuid, ProductRecord>,
) -> Result<ShopUuid, OrdersServiceError> {
    let shops: FxHashSet<ShopUuid> = products.values().map(|product| product.shop).collect();

    let mut shops = shops.into_iter();

    match (shops.next(), shops.next()) {
        (Some(shop), None) => Ok(shop),
        (Some(_), Some(_)) => Err(OrdersServiceError::MultiShop),
        (None, _) => Err(OrdersServiceError::EmptyCart),
    }
}

fn check_line(product: &ProductRecord, quantity: u32) -> Result<(), OrdersServiceError> {
    if !product.is_purchasable() {
        return Err(OrdersServiceError::ProductUnavailable {
            product: product.uuid,
            name: product.name.clone(),
        });
    }

    if quantity > product.stock {
        return Err(OrdersServiceError::InsufficientStock {
            product: product.uuid,
            name: product.name.clone(),
            requested: quantity,
            available: product.stock,
        });
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn checkout(
        &self,
        actor: Identity,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !actor.is_customer() {
            return Err(OrdersServiceError::Forbidden);
        }

        let fulfilment = Fulfilment::from_parts(
            checkout.delivery_type,
            checkout.delivery_address,
            checkout.delivery_island,
            checkout.delivery_atoll,
        )
        .map_err(|e| OrdersServiceError::Validation(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .cart_items_repository
            .list_cart_items(&mut tx, actor.user)
            .await?;

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let product_uuids: Vec<ProductUuid> = cart.iter().map(|item| item.product).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .products_repository
            .lock_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let shop = single_shop(&products)?;

        let mut lines = Vec::with_capacity(cart.len());

        for item in &cart {
            let product = products
                .get(&item.product)
                .ok_or(OrdersServiceError::InvalidReference)?;

            check_line(product, item.quantity)?;

            lines.push((product, item.quantity));
        }

        let shop = self.checkout_shop(&mut tx, shop).await?;

        let priced: Vec<PricedLine> = lines
            .iter()
            .map(|(product, quantity)| PricedLine::new(product.price, *quantity))
            .collect();

        let quote = self
            .pricing
            .quote(&priced, delivery_fee(&shop.delivery_zones, &fulfilment))?;

        let mut order = self
            .insert_order(
                &mut tx,
                NewOrder {
                    uuid: OrderUuid::new(),
                    order_number: generate_order_number(Timestamp::now()),
                    customer: actor.user,
                    shop: shop.uuid,
                    subtotal: quote.subtotal,
                    tax: quote.tax,
                    delivery: quote.delivery,
                    total: quote.total,
                    fulfilment,
                    payment_method: checkout.payment_method,
                },
            )
            .await?;

        for (product, quantity) in lines {
            let item = self
                .items_repository
                .create_order_item(&mut tx, order.uuid, product, quantity)
                .await?;

            let decremented = self
                .products_repository
                .decrement_stock(&mut tx, product.uuid, quantity)
                .await?;

            if !decremented {
                return Err(OrdersServiceError::InsufficientStock {
                    product: product.uuid,
                    name: product.name.clone(),
                    requested: quantity,
                    available: product.stock,
                });
            }

            order.items.push(item);
        }

        self.cart_items_repository
            .clear_cart(&mut tx, actor.user)
            .await?;

        tx.commit().await?;

        info!(
            order = %order.uuid,
            order_number = %order.order_number,
            shop = %order.shop,
            total = order.total,
            items = order.items.len(),
            "order placed"
        );

        Ok(order)
    }

    async fn get_order(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders_repository.get_order(&mut tx, order).await?;

        self.ensure_visible(&mut tx, actor, &order).await?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut order))
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_customer_orders(
        &self,
        actor: Identity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        if !actor.is_customer() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let mut orders = self
            .orders_repository
            .list_customer_orders(&mut tx, actor.user)
            .await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_shop_orders(
        &self,
        actor: Identity,
        shop: ShopUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.shops_repository.get_shop(&mut tx, shop).await?;

        if !actor.may_manage(record.owner) {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut orders = self
            .orders_repository
            .list_shop_orders(&mut tx, shop)
            .await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        actor: Identity,
        order: OrderUuid,
        next: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.lock_for_seller(&mut tx, actor, order).await?;

        let invalid = OrdersServiceError::InvalidTransition {
            from: current.status,
            to: next,
        };

        if !current.status.can_transition_to(next) {
            return Err(invalid);
        }

        let mut updated = self
            .orders_repository
            .update_status(&mut tx, order, current.status, next)
            .await?
            .ok_or(invalid)?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        info!(
            order = %order,
            from = %current.status,
            to = %next,
            "order status updated"
        );

        Ok(updated)
    }

    async fn verify_payment(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.lock_for_seller(&mut tx, actor, order).await?;

        let invalid = OrdersServiceError::InvalidPaymentTransition {
            from: current.payment_status,
            to: PaymentStatus::Verified,
        };

        if current.payment_status != PaymentStatus::Pending {
            return Err(invalid);
        }

        if current.receipt_url.is_none() {
            return Err(OrdersServiceError::ReceiptRequired);
        }

        let mut updated = self
            .orders_repository
            .update_payment_status(
                &mut tx,
                order,
                PaymentStatus::Pending,
                PaymentStatus::Verified,
            )
            .await?
            .ok_or(invalid)?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        info!(order = %order, "payment verified");

        Ok(updated)
    }

    async fn mark_paid(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.lock_for_seller(&mut tx, actor, order).await?;

        let invalid = OrdersServiceError::InvalidPaymentTransition {
            from: current.payment_status,
            to: PaymentStatus::Paid,
        };

        if !current
            .payment_status
            .can_transition_to(PaymentStatus::Paid, current.payment_method)
        {
            return Err(invalid);
        }

        let mut updated = self
            .orders_repository
            .update_payment_status(&mut tx, order, current.payment_status, PaymentStatus::Paid)
            .await?
            .ok_or(invalid)?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        info!(order = %order, method = %current.payment_method, "order marked paid");

        Ok(updated)
    }

    async fn upload_receipt(
        &self,
        actor: Identity,
        order: OrderUuid,
        file: ReceiptFile,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let content_type = self.receipt_policy.check(&file)?;

        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if current.customer != actor.user {
            return Err(OrdersServiceError::Forbidden);
        }

        if current.payment_status != PaymentStatus::Pending {
            return Err(OrdersServiceError::ReceiptLocked(current.payment_status));
        }

        let key = format!(
            "orders/{order}/{}.{}",
            Uuid::now_v7().simple(),
            content_type.extension()
        );

        self.receipts.put(&key, content_type, &file.bytes).await?;

        let updated = match self
            .attach_receipt(tx, order, &key, current.payment_status)
            .await
        {
            Ok(updated) => updated,
            Err(error) => {
                self.discard_receipt(&key).await;

                return Err(error);
            }
        };

        if let Some(previous) = current.receipt_key.as_deref() {
            self.discard_receipt(previous).await;
        }

        info!(order = %order, receipt_key = %key, "receipt uploaded");

        Ok(updated)
    }

    async fn get_receipt(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<StoredReceipt, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;

        self.ensure_visible(&mut tx, actor, &order).await?;

        tx.commit().await?;

        let key = order.receipt_key.ok_or(OrdersServiceError::NoReceipt)?;
        let content_type =
            ReceiptContentType::from_key(&key).ok_or(OrdersServiceError::InvalidData)?;

        let bytes = self.receipts.read(&key).await?;

        Ok(StoredReceipt {
            content_type,
            bytes,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the actor's cart into an order, atomically.
    async fn checkout(
        &self,
        actor: Identity,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve an order visible to the actor: its customer, the shop's seller, or an admin.
    async fn get_order(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The actor's own orders, newest first.
    async fn list_customer_orders(
        &self,
        actor: Identity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Orders placed with a shop the actor manages, newest first.
    async fn list_shop_orders(
        &self,
        actor: Identity,
        shop: ShopUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order to `next` if the transition table allows it.
    async fn update_status(
        &self,
        actor: Identity,
        order: OrderUuid,
        next: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Mark a pending payment verified. Requires an uploaded receipt.
    async fn verify_payment(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Mark an order paid.
    async fn mark_paid(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Attach or replace the payment receipt while payment is still pending.
    ///
    /// A replaced receipt file is removed from storage.
    async fn upload_receipt(
        &self,
        actor: Identity,
        order: OrderUuid,
        file: ReceiptFile,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The current receipt file, for anyone who may see the order.
    async fn get_receipt(
        &self,
        actor: Identity,
        order: OrderUuid,
    ) -> Result<StoredReceipt, OrdersServiceError>;
}
