// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use pos_core::store::MySqlStore;
use pos_core::users::{CreateUser, UserService};
use sqlx::MySqlPool;

mod cli;
mod logging;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    let _logger = logging::init(args.verbose)?;

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: &Cli) -> Result<()> {
    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Migrate => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let pool = connect(&args.database_url).await?;
                pos_core::migrate::migrate(&pool).await?;
                log::info!("migrations applied");
                Ok::<_, Error>(())
            })?;
        }
        Commands::CreateUser {
            name,
            username,
            email,
            role,
            created_by,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            let password = runtime.block_on(async {
                let pool = connect(&args.database_url).await?;
                let users = UserService::new(Arc::new(MySqlStore::new(pool)));
                let (_, password) = users
                    .create_user(CreateUser {
                        name,
                        username,
                        email,
                        role,
                        created_by,
                    })
                    .await?;
                Ok::<_, Error>(password)
            })?;
            log::info!("created user {username} with role {role}");
            println!("{password}");
        }
    }

    Ok(())
}

async fn connect(database_url: &Option<String>) -> Result<MySqlPool> {
    let url = database_url
        .as_deref()
        .ok_or_else(|| Error::Custom("DATABASE_URL is not set (use --database-url)".into()))?;
    Ok(MySqlPool::connect(url).await?)
}
