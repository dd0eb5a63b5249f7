use clap::Args;
use petmart_app::{
    database::Db,
    domain::{
        products::{PgProductsService, ProductsService, data::NewProduct, records::ProductUuid},
        shops::records::ShopUuid,
        users::{PgUsersService, records::UserUuid},
    },
};

use crate::cli::{connect, identity_of};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// UUID of the seller creating the product
    #[arg(long)]
    seller: UserUuid,

    /// Shop the product is listed in
    #[arg(long)]
    shop: ShopUuid,

    #[arg(long)]
    name: String,

    /// Unit price in laari
    #[arg(long)]
    price: u64,

    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// List the product as unavailable
    #[arg(long)]
    unavailable: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;
    let db = Db::new(pool);

    let seller = identity_of(&PgUsersService::new(db.clone()), args.seller).await?;

    let product = PgProductsService::new(db)
        .create_product(
            seller,
            NewProduct {
                uuid: ProductUuid::new(),
                shop: args.shop,
                name: args.name,
                price: args.price,
                stock: args.stock,
                is_available: !args.unavailable,
            },
        )
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_name: {}", product.name);
    println!("product_price: {}", product.price);
    println!("product_stock: {}", product.stock);

    Ok(())
}
