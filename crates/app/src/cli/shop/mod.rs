use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct ShopCommand {
    #[command(subcommand)]
    command: ShopSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShopSubcommand {
    Create(create::CreateShopArgs),
}

pub(crate) async fn run(command: ShopCommand) -> Result<(), String> {
    match command.command {
        ShopSubcommand::Create(args) => create::run(args).await,
    }
}
