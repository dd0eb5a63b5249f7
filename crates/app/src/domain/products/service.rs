//! Products service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        shops::{records::ShopUuid, repository::PgShopsRepository},
        users::records::Identity,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    shops: PgShopsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            shops: PgShopsRepository::new(),
        }
    }

    async fn authorize(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Identity,
        shop: ShopUuid,
    ) -> Result<(), ProductsServiceError> {
        let shop = self.shops.get_shop(tx, shop).await?;

        if !actor.may_manage(shop.owner) {
            return Err(ProductsServiceError::Forbidden);
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ProductsServiceError> {
    if name.trim().is_empty() {
        return Err(ProductsServiceError::Validation(
            "product name must not be blank".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        shop: ShopUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, shop).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        actor: Identity,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate_name(&product.name)?;

        let mut tx = self.db.begin().await?;

        self.authorize(&mut tx, actor, product.shop).await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        actor: Identity,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate_name(&update.name)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_product(&mut tx, product).await?;

        self.authorize(&mut tx, actor, existing.shop).await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        actor: Identity,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_product(&mut tx, product).await?;

        self.authorize(&mut tx, actor, existing.shop).await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all live products of a shop.
    async fn list_products(
        &self,
        shop: ShopUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product in a shop the actor manages.
    async fn create_product(
        &self,
        actor: Identity,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Updates a product's name, price, stock and availability.
    async fn update_product(
        &self,
        actor: Identity,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product. Past orders keep their snapshot.
    async fn delete_product(
        &self,
        actor: Identity,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError>;
}
