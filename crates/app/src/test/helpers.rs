//! Test Helpers

use crate::{
    auth::generate_api_token,
    domain::{
        carts::{CartsService, CartsServiceError, data::NewCartItem, records::CartItemRecord},
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        shops::{
            ShopsService, ShopsServiceError,
            data::NewShop,
            records::{BankDetails, DeliveryZone, ShopRecord, ShopUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{Identity, Role, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_user(
    ctx: &TestContext,
    role: Role,
) -> Result<Identity, UsersServiceError> {
    let uuid = UserUuid::new();

    let user = ctx
        .users
        .create_user(NewUser {
            uuid,
            name: format!("{role} {uuid}"),
            email: format!("{uuid}@example.mv"),
            role,
            token_hash: generate_api_token().hash(),
        })
        .await?;

    Ok(user.identity())
}

pub(crate) async fn create_customer(ctx: &TestContext) -> Result<Identity, UsersServiceError> {
    create_user(ctx, Role::Customer).await
}

pub(crate) async fn create_seller(ctx: &TestContext) -> Result<Identity, UsersServiceError> {
    create_user(ctx, Role::Seller).await
}

pub(crate) async fn create_shop(
    ctx: &TestContext,
    seller: Identity,
    zones: Vec<DeliveryZone>,
) -> Result<ShopRecord, ShopsServiceError> {
    let shop = ctx
        .shops
        .create_shop(
            seller,
            NewShop {
                uuid: ShopUuid::new(),
                owner: seller.user,
                name: "Paws".to_string(),
                bank: BankDetails::default(),
            },
        )
        .await?;

    if zones.is_empty() {
        return Ok(shop);
    }

    ctx.shops.set_delivery_zones(seller, shop.uuid, zones).await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    seller: Identity,
    shop: ShopUuid,
    name: &str,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(
            seller,
            NewProduct {
                uuid: ProductUuid::new(),
                shop,
                name: name.to_string(),
                price,
                stock,
                is_available: true,
            },
        )
        .await
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    customer: Identity,
    product: ProductUuid,
    quantity: u32,
) -> Result<CartItemRecord, CartsServiceError> {
    ctx.carts
        .add_item(customer, NewCartItem { product, quantity })
        .await
}
