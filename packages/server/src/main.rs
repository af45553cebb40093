use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use server::complaint::SeaOrmComplaintRepository;
use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;
use server::storage::build_object_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    info!("Database schema synced");

    let object_store = build_object_store(&config.storage).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        object_store,
        complaints: Arc::new(SeaOrmComplaintRepository::new(db)),
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
