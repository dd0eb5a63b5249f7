use clap::Args;
use petmart_app::{
    auth::generate_api_token,
    database::Db,
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{Role, UserUuid},
    },
};

use crate::cli::connect;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Email address, unique across users
    #[arg(long)]
    email: String,

    /// One of customer, seller or admin
    #[arg(long, default_value = "customer")]
    role: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let role: Role = args
        .role
        .to_ascii_uppercase()
        .parse()
        .map_err(|error| format!("invalid role: {error}"))?;

    let pool = connect(&args.database_url).await?;
    let service = PgUsersService::new(Db::new(pool));

    let token = generate_api_token();

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: args.name,
            email: args.email,
            role,
            token_hash: token.hash(),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_role: {}", user.role);
    println!("api_token: {token}");
    println!("store this token now; it is only shown once");

    Ok(())
}
