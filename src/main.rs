use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shimatube::api::{ApiServer, ApiServerConfig, AppState};
use shimatube::database;
use shimatube::database::repositories::{SqlxLibraryRepository, SqlxPinnedChannelRepository};
use shimatube::extractor::YtDlpExtractor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shimatube=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:shimatube.db?mode=rwc".to_string());

    let pool = database::init_pool(&database_url).await?;
    database::run_migrations(&pool).await?;

    // Wire services
    let extractor = Arc::new(YtDlpExtractor::from_env());
    let state = AppState::with_services(
        extractor,
        Arc::new(SqlxLibraryRepository::new(pool.clone())),
        Arc::new(SqlxPinnedChannelRepository::new(pool)),
    );

    let config = ApiServerConfig::from_env_or_default();
    let server = ApiServer::with_state(config, state);

    // Ctrl-C triggers graceful shutdown.
    let cancel_token = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_token.cancel();
        }
    });

    server.run().await?;

    Ok(())
}
