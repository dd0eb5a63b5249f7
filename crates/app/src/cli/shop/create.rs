use clap::Args;
use petmart_app::{
    database::Db,
    domain::{
        shops::{
            PgShopsService, ShopsService,
            data::NewShop,
            records::{BankDetails, DeliveryZone, ShopUuid},
        },
        users::{PgUsersService, records::UserUuid},
    },
};

use crate::cli::{connect, identity_of};

#[derive(Debug, Args)]
pub(crate) struct CreateShopArgs {
    /// UUID of the seller who owns the shop
    #[arg(long)]
    owner: UserUuid,

    /// Shop display name
    #[arg(long)]
    name: String,

    #[arg(long)]
    bank_name: Option<String>,

    #[arg(long)]
    account_name: Option<String>,

    #[arg(long)]
    account_number: Option<String>,

    /// Delivery zone as `AREA=FEE`, fee in laari; repeat for more zones
    #[arg(long = "zone", value_parser = parse_zone)]
    zones: Vec<DeliveryZone>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

fn parse_zone(raw: &str) -> Result<DeliveryZone, String> {
    let (area, fee) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected AREA=FEE, got '{raw}'"))?;

    let fee = fee
        .trim()
        .parse::<u64>()
        .map_err(|error| format!("invalid fee in '{raw}': {error}"))?;

    Ok(DeliveryZone::new(area.trim(), fee))
}

pub(crate) async fn run(args: CreateShopArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;
    let db = Db::new(pool);

    let owner = identity_of(&PgUsersService::new(db.clone()), args.owner).await?;
    let service = PgShopsService::new(db);

    let mut shop = service
        .create_shop(
            owner,
            NewShop {
                uuid: ShopUuid::new(),
                owner: owner.user,
                name: args.name,
                bank: BankDetails {
                    bank_name: args.bank_name,
                    account_name: args.account_name,
                    account_number: args.account_number,
                },
            },
        )
        .await
        .map_err(|error| format!("failed to create shop: {error}"))?;

    if !args.zones.is_empty() {
        shop = service
            .set_delivery_zones(owner, shop.uuid, args.zones)
            .await
            .map_err(|error| format!("failed to set delivery zones: {error}"))?;
    }

    println!("shop_uuid: {}", shop.uuid);
    println!("shop_name: {}", shop.name);

    for zone in &shop.delivery_zones {
        println!("delivery_zone: {} = {}", zone.area, zone.fee);
    }

    Ok(())
}
