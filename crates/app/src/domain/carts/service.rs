//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartLine},
            repositories::PgCartItemsRepository,
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::Identity,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Lock a product that can be put in a cart. Unavailable counts as missing.
    ///
    /// The row lock is held until commit so the cart line read that follows
    /// cannot race another request for the same product.
    async fn purchasable_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        let product = self
            .products_repository
            .lock_products(tx, &[product])
            .await?
            .into_iter()
            .next()
            .ok_or(CartsServiceError::NotFound)?;

        if !product.is_purchasable() {
            return Err(CartsServiceError::NotFound);
        }

        Ok(product)
    }
}

fn require_customer(actor: Identity) -> Result<(), CartsServiceError> {
    if actor.is_customer() {
        Ok(())
    } else {
        Err(CartsServiceError::Forbidden)
    }
}

fn require_positive(quantity: u32) -> Result<(), CartsServiceError> {
    if quantity < 1 {
        return Err(CartsServiceError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn check_stock(product: &ProductRecord, requested: u32) -> Result<(), CartsServiceError> {
    if requested > product.stock {
        return Err(CartsServiceError::OutOfStock {
            product: product.uuid,
            requested,
            available: product.stock,
        });
    }

    Ok(())
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn add_item(
        &self,
        actor: Identity,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        require_customer(actor)?;
        require_positive(item.quantity)?;

        let mut tx = self.db.begin().await?;

        let product = self.purchasable_product(&mut tx, item.product).await?;

        let existing = self
            .items_repository
            .find_cart_item_by_product(&mut tx, actor.user, item.product)
            .await?
            .map_or(0, |existing| existing.quantity);

        check_stock(&product, existing.saturating_add(item.quantity))?;

        let item = self
            .items_repository
            .upsert_cart_item(&mut tx, actor.user, item.product, item.quantity)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn list_items(&self, actor: Identity) -> Result<Vec<CartLine>, CartsServiceError> {
        require_customer(actor)?;

        let mut tx = self.db.begin().await?;

        let lines = self
            .items_repository
            .list_cart_lines(&mut tx, actor.user)
            .await?;

        tx.commit().await?;

        Ok(lines)
    }

    async fn set_quantity(
        &self,
        actor: Identity,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError> {
        require_customer(actor)?;
        require_positive(quantity)?;

        let mut tx = self.db.begin().await?;

        let existing = self
            .items_repository
            .get_cart_item(&mut tx, actor.user, item)
            .await?;

        let product = self.purchasable_product(&mut tx, existing.product).await?;

        check_stock(&product, quantity)?;

        let updated = self
            .items_repository
            .set_cart_item_quantity(&mut tx, actor.user, item, quantity)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn remove_item(
        &self,
        actor: Identity,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        require_customer(actor)?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, actor.user, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, actor: Identity) -> Result<u64, CartsServiceError> {
        require_customer(actor)?;

        let mut tx = self.db.begin().await?;

        let removed = self.items_repository.clear_cart(&mut tx, actor.user).await?;

        tx.commit().await?;

        Ok(removed)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a product to the actor's cart, or increase the quantity already there.
    async fn add_item(
        &self,
        actor: Identity,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Lines of the actor's cart whose product can still be bought.
    async fn list_items(&self, actor: Identity) -> Result<Vec<CartLine>, CartsServiceError>;

    /// Replace the quantity of one of the actor's cart lines.
    async fn set_quantity(
        &self,
        actor: Identity,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Remove one line from the actor's cart.
    async fn remove_item(&self, actor: Identity, item: CartItemUuid)
    -> Result<(), CartsServiceError>;

    /// Empty the actor's cart, returning how many lines were removed.
    async fn clear(&self, actor: Identity) -> Result<u64, CartsServiceError>;
}
