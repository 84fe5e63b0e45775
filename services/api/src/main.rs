use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    AppState,
    config::{AppConfig, StoreBackend},
    repositories::{MemoryStore, Store},
    routes,
    shutdown::shutdown_signal,
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    info!("Starting apartment API service");

    let config = AppConfig::load()?;

    let store = match config.store.backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            if config.store.run_migrations {
                run_migrations(&pool).await?;
            }
            Store::Postgres(pool)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            Store::Memory(MemoryStore::new())
        }
    };

    let app = routes::create_router(AppState::new(store));

    let addr = config.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}
