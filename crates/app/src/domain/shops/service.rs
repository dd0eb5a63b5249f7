//! Shops service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        shops::{
            data::{NewShop, ShopUpdate},
            errors::ShopsServiceError,
            records::{DeliveryZone, ShopRecord, ShopUuid},
            repository::PgShopsRepository,
        },
        users::records::{Identity, Role},
    },
};

#[derive(Debug, Clone)]
pub struct PgShopsService {
    db: Db,
    repository: PgShopsRepository,
}

impl PgShopsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShopsRepository::new(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ShopsServiceError> {
    if name.trim().is_empty() {
        return Err(ShopsServiceError::Validation(
            "shop name must not be blank".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl ShopsService for PgShopsService {
    async fn create_shop(
        &self,
        actor: Identity,
        shop: NewShop,
    ) -> Result<ShopRecord, ShopsServiceError> {
        if actor.role == Role::Customer || !actor.may_manage(shop.owner) {
            return Err(ShopsServiceError::Forbidden);
        }

        validate_name(&shop.name)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_shop(&mut tx, &shop).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_shop(&self, shop: ShopUuid) -> Result<ShopRecord, ShopsServiceError> {
        let mut tx = self.db.begin().await?;

        let shop = self.repository.get_shop(&mut tx, shop).await?;

        tx.commit().await?;

        Ok(shop)
    }

    async fn update_shop(
        &self,
        actor: Identity,
        shop: ShopUuid,
        update: ShopUpdate,
    ) -> Result<ShopRecord, ShopsServiceError> {
        validate_name(&update.name)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_shop(&mut tx, shop).await?;

        if !actor.may_manage(existing.owner) {
            return Err(ShopsServiceError::Forbidden);
        }

        let updated = self.repository.update_shop(&mut tx, shop, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_delivery_zones(
        &self,
        actor: Identity,
        shop: ShopUuid,
        zones: Vec<DeliveryZone>,
    ) -> Result<ShopRecord, ShopsServiceError> {
        if zones.iter().any(|zone| zone.area.trim().is_empty()) {
            return Err(ShopsServiceError::Validation(
                "delivery zone area must not be blank".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let mut existing = self.repository.get_shop(&mut tx, shop).await?;

        if !actor.may_manage(existing.owner) {
            return Err(ShopsServiceError::Forbidden);
        }

        self.repository
            .replace_delivery_zones(&mut tx, shop, &zones)
            .await?;

        tx.commit().await?;

        existing.delivery_zones = zones;

        Ok(existing)
    }
}

#[automock]
#[async_trait]
pub trait ShopsService: Send + Sync {
    /// Creates a shop owned by a seller. Admins may create shops for any seller.
    async fn create_shop(
        &self,
        actor: Identity,
        shop: NewShop,
    ) -> Result<ShopRecord, ShopsServiceError>;

    /// Retrieve a single shop with its delivery zones.
    async fn get_shop(&self, shop: ShopUuid) -> Result<ShopRecord, ShopsServiceError>;

    /// Updates name, active flag and bank details.
    async fn update_shop(
        &self,
        actor: Identity,
        shop: ShopUuid,
        update: ShopUpdate,
    ) -> Result<ShopRecord, ShopsServiceError>;

    /// Replaces the delivery zone table. Zone order is lookup order.
    async fn set_delivery_zones(
        &self,
        actor: Identity,
        shop: ShopUuid,
        zones: Vec<DeliveryZone>,
    ) -> Result<ShopRecord, ShopsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::shops::records::BankDetails,
        test::{
            TestContext,
            helpers::{create_customer, create_seller, create_shop},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_shop_starts_active_without_zones() -> TestResult {
        let ctx = TestContext::new().await;
        let seller = create_seller(&ctx).await?;

        let shop = create_shop(&ctx, seller, Vec::new()).await?;

        assert_eq!(shop.owner, seller.user);
        assert!(shop.is_active);
        assert!(shop.delivery_zones.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_create_shops() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx).await?;

        let result = ctx
            .shops
            .create_shop(
                customer,
                NewShop {
                    uuid: ShopUuid::new(),
                    owner: customer.user,
                    name: "Paws".to_string(),
                    bank: BankDetails::default(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(ShopsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delivery_zones_keep_their_order() -> TestResult {
        let ctx = TestContext::new().await;
        let seller = create_seller(&ctx).await?;
        let shop = create_shop(&ctx, seller, Vec::new()).await?;

        ctx.shops
            .set_delivery_zones(
                seller,
                shop.uuid,
                vec![
                    DeliveryZone::new("Male", 25_00),
                    DeliveryZone::new("Hulhumale", 40_00),
                ],
            )
            .await?;

        ctx.shops
            .set_delivery_zones(
                seller,
                shop.uuid,
                vec![
                    DeliveryZone::new("Villingili", 30_00),
                    DeliveryZone::new("Male", 20_00),
                ],
            )
            .await?;

        let fetched = ctx.shops.get_shop(shop.uuid).await?;

        assert_eq!(
            fetched.delivery_zones,
            vec![
                DeliveryZone::new("Villingili", 30_00),
                DeliveryZone::new("Male", 20_00),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_sellers_cannot_update_shop() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = create_seller(&ctx).await?;
        let intruder = create_seller(&ctx).await?;
        let shop = create_shop(&ctx, owner, Vec::new()).await?;

        let result = ctx
            .shops
            .update_shop(
                intruder,
                shop.uuid,
                ShopUpdate {
                    name: "Mine now".to_string(),
                    is_active: false,
                    bank: BankDetails::default(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(ShopsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        assert!(ctx.shops.get_shop(shop.uuid).await?.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn update_shop_sets_bank_details() -> TestResult {
        let ctx = TestContext::new().await;
        let seller = create_seller(&ctx).await?;
        let shop = create_shop(&ctx, seller, Vec::new()).await?;

        let bank = BankDetails {
            bank_name: Some("Bank of Maldives".to_string()),
            account_name: Some("Paws Pvt Ltd".to_string()),
            account_number: Some("7730000123456".to_string()),
        };

        let updated = ctx
            .shops
            .update_shop(
                seller,
                shop.uuid,
                ShopUpdate {
                    name: "Paws & Claws".to_string(),
                    is_active: false,
                    bank: bank.clone(),
                },
            )
            .await?;

        assert_eq!(updated.name, "Paws & Claws");
        assert!(!updated.is_active);
        assert_eq!(updated.bank, bank);

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_shop_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.shops.get_shop(ShopUuid::new()).await;

        assert!(
            matches!(result, Err(ShopsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
