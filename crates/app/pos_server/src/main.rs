//! POS API server binary.

use std::sync::Arc;

use clap::Parser;
use pos_api::AppState;
use pos_api::config::ApiConfig;
use pos_core::store::MySqlStore;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

/// CLI arguments for the API server. Everything else comes from the environment.
#[derive(Parser, Debug)]
#[command(name = "pos_server", about = "POS API server")]
struct Args {
    /// Port to listen on; overrides `BIND_ADDR` and `APP_PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// MySQL connection URL; overrides `DATABASE_URL` and the `DB_*` variables.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 10)]
    max_connections: u32,

    /// Apply embedded migrations before serving.
    #[arg(long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,pos_api=debug,pos_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(port) = args.port {
        config.bind_addr = format!("0.0.0.0:{port}");
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!(
        bind_addr = %config.bind_addr,
        max_connections = args.max_connections,
        signing_algorithm = ?config.signing_algorithm,
        login_minutes = config.login_minutes,
        "starting pos_server"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    if args.migrate {
        info!("running database migrations");
        pos_core::migrate::migrate(&pool).await?;
    }

    let store = Arc::new(MySqlStore::new(pool));
    let state = AppState::build(config.clone(), store.clone(), store).await;

    let app = pos_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
