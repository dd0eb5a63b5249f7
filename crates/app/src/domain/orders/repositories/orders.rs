//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    orders::{
        data::NewOrder,
        records::{OrderRecord, OrderUuid, Timeline},
        status::{Milestone, OrderStatus, PaymentStatus},
    },
    shops::{
        delivery::{DeliveryAddress, DeliveryType, Fulfilment},
        records::ShopUuid,
    },
    users::records::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_CUSTOMER_ORDERS_SQL: &str = include_str!("../sql/list_customer_orders.sql");
const LIST_SHOP_ORDERS_SQL: &str = include_str!("../sql/list_shop_orders.sql");
const UPDATE_STATUS_SQL: &str = include_str!("../sql/update_status.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("../sql/update_payment_status.sql");
const SET_RECEIPT_SQL: &str = include_str!("../sql/set_receipt.sql");

pub(super) fn amount_to_i64(amount: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(super) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_get_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Option<jiff::Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order. Returns `None` if the order number is already taken.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let address = order.fulfilment.address();

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.order_number)
            .bind(order.customer.into_uuid())
            .bind(order.shop.into_uuid())
            .bind(amount_to_i64(order.subtotal, "subtotal")?)
            .bind(amount_to_i64(order.tax, "tax")?)
            .bind(amount_to_i64(order.delivery, "delivery")?)
            .bind(amount_to_i64(order.total, "total")?)
            .bind(order.fulfilment.delivery_type().as_str())
            .bind(address.map(|a| a.address.as_str()))
            .bind(address.map(|a| a.island.as_str()))
            .bind(address.map(|a| a.atoll.as_str()))
            .bind(order.payment_method.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_customer_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_CUSTOMER_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_shop_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_SHOP_ORDERS_SQL)
            .bind(shop.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Move an order from `current` to `next`, stamping the milestone if unset.
    ///
    /// Returns `None` if the order is no longer in `current`.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        current: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(next.as_str())
            .bind(current.as_str())
            .bind(next.milestone().map(Milestone::as_str))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move payment from `current` to `next`. Returns `None` if it has moved on.
    pub(crate) async fn update_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        current: PaymentStatus,
        next: PaymentStatus,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(next.as_str())
            .bind(current.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Point the order at a new receipt. Returns `None` once payment is no longer pending.
    pub(crate) async fn set_receipt(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        receipt_url: &str,
        receipt_key: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_RECEIPT_SQL)
            .bind(order.into_uuid())
            .bind(receipt_url)
            .bind(receipt_key)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let delivery_type: DeliveryType = try_get_parsed(row, "delivery_type")?;

        let fulfilment = match delivery_type {
            DeliveryType::Pickup => Fulfilment::Pickup,
            DeliveryType::Delivery => Fulfilment::Delivery(DeliveryAddress {
                address: row.try_get("delivery_address")?,
                island: row.try_get("delivery_island")?,
                atoll: row.try_get("delivery_atoll")?,
            }),
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            customer: UserUuid::from_uuid(row.try_get("customer_uuid")?),
            shop: ShopUuid::from_uuid(row.try_get("shop_uuid")?),
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            delivery: try_get_amount(row, "delivery")?,
            total: try_get_amount(row, "total")?,
            fulfilment,
            payment_method: try_get_parsed(row, "payment_method")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            status: try_get_parsed(row, "status")?,
            receipt_url: row.try_get("receipt_url")?,
            receipt_key: row.try_get("receipt_key")?,
            receipt_uploaded_at: try_get_timestamp(row, "receipt_uploaded_at")?,
            payment_verified_at: try_get_timestamp(row, "payment_verified_at")?,
            paid_at: try_get_timestamp(row, "paid_at")?,
            timeline: Timeline {
                confirmed_at: try_get_timestamp(row, "confirmed_at")?,
                preparing_at: try_get_timestamp(row, "preparing_at")?,
                ready_at: try_get_timestamp(row, "ready_at")?,
                out_for_delivery_at: try_get_timestamp(row, "out_for_delivery_at")?,
                delivered_at: try_get_timestamp(row, "delivered_at")?,
                picked_up_at: try_get_timestamp(row, "picked_up_at")?,
                cancelled_at: try_get_timestamp(row, "cancelled_at")?,
            },
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
