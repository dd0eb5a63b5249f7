use clap::{Parser, Subcommand};
use petmart_app::{
    database,
    domain::users::{
        UsersService,
        records::{Identity, UserRecord, UserUuid},
    },
};
use sqlx::PgPool;

mod db;
mod product;
mod shop;
mod user;

#[derive(Debug, Parser)]
#[command(name = "petmart-app", about = "Petmart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    User(user::UserCommand),
    Shop(shop::ShopCommand),
    Product(product::ProductCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::User(command) => user::run(command).await,
            Commands::Shop(command) => shop::run(command).await,
            Commands::Product(command) => product::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

/// Act as an existing user, with the role stored for them.
pub(crate) async fn identity_of(
    users: &impl UsersService,
    user: UserUuid,
) -> Result<Identity, String> {
    users
        .get_user(user)
        .await
        .map(|record| UserRecord::identity(&record))
        .map_err(|error| format!("failed to load user {user}: {error}"))
}
