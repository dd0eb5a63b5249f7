//! Shops Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    shops::{
        data::{NewShop, ShopUpdate},
        records::{BankDetails, DeliveryZone, ShopRecord, ShopUuid},
    },
    users::records::UserUuid,
};

const CREATE_SHOP_SQL: &str = include_str!("sql/create_shop.sql");
const GET_SHOP_SQL: &str = include_str!("sql/get_shop.sql");
const UPDATE_SHOP_SQL: &str = include_str!("sql/update_shop.sql");
const LIST_DELIVERY_ZONES_SQL: &str = include_str!("sql/list_delivery_zones.sql");
const DELETE_DELIVERY_ZONES_SQL: &str = include_str!("sql/delete_delivery_zones.sql");
const CREATE_DELIVERY_ZONE_SQL: &str = include_str!("sql/create_delivery_zone.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShopsRepository;

impl PgShopsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: &NewShop,
    ) -> Result<ShopRecord, sqlx::Error> {
        query_as::<Postgres, ShopRecord>(CREATE_SHOP_SQL)
            .bind(shop.uuid.into_uuid())
            .bind(shop.owner.into_uuid())
            .bind(&shop.name)
            .bind(&shop.bank.bank_name)
            .bind(&shop.bank.account_name)
            .bind(&shop.bank.account_number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an active (not soft-deleted) shop together with its zone table.
    pub(crate) async fn get_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<ShopRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, ShopRecord>(GET_SHOP_SQL)
            .bind(shop.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.delivery_zones = self.list_delivery_zones(tx, shop).await?;

        Ok(record)
    }

    pub(crate) async fn update_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        update: &ShopUpdate,
    ) -> Result<ShopRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, ShopRecord>(UPDATE_SHOP_SQL)
            .bind(shop.into_uuid())
            .bind(&update.name)
            .bind(update.is_active)
            .bind(&update.bank.bank_name)
            .bind(&update.bank.account_name)
            .bind(&update.bank.account_number)
            .fetch_one(&mut **tx)
            .await?;

        record.delivery_zones = self.list_delivery_zones(tx, shop).await?;

        Ok(record)
    }

    pub(crate) async fn list_delivery_zones(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<Vec<DeliveryZone>, sqlx::Error> {
        query_as::<Postgres, DeliveryZone>(LIST_DELIVERY_ZONES_SQL)
            .bind(shop.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace the zone table, keeping the given order as lookup order.
    pub(crate) async fn replace_delivery_zones(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        zones: &[DeliveryZone],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_DELIVERY_ZONES_SQL)
            .bind(shop.into_uuid())
            .execute(&mut **tx)
            .await?;

        for (position, zone) in zones.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            let fee = i64::try_from(zone.fee).map_err(|e| sqlx::Error::ColumnDecode {
                index: "fee".to_string(),
                source: Box::new(e),
            })?;

            query(CREATE_DELIVERY_ZONE_SQL)
                .bind(Uuid::now_v7())
                .bind(shop.into_uuid())
                .bind(position)
                .bind(&zone.area)
                .bind(fee)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ShopRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ShopUuid::from_uuid(row.try_get("uuid")?),
            owner: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            bank: BankDetails {
                bank_name: row.try_get("bank_name")?,
                account_name: row.try_get("bank_account_name")?,
                account_number: row.try_get("bank_account_number")?,
            },
            delivery_zones: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DeliveryZone {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let fee_i64: i64 = row.try_get("fee")?;

        let fee = u64::try_from(fee_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "fee".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            area: row.try_get("area")?,
            fee,
        })
    }
}
