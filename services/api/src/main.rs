use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::{
    AppState, MIGRATOR,
    artsy::{ArtsyClient, ArtsyTokenIssuer, TokenCache, http_client},
    repositories::PgUserStore,
    routes,
    session::SessionService,
    settings::Settings,
};
use common::database::{DatabaseConfig, health_check, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let settings = Settings::new().context("Failed to load settings")?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    // External catalog client
    let http = http_client(settings.artsy.request_timeout_secs)?;
    let issuer = ArtsyTokenIssuer::new(
        http.clone(),
        &settings.artsy.base_url,
        settings.artsy.client_id.clone(),
        settings.artsy.client_secret.clone(),
    );
    let tokens = TokenCache::new(Arc::new(issuer));
    if let Err(e) = tokens.ensure_valid_token().await {
        warn!("Catalog token warm-up failed, will retry on first request: {}", e);
    }
    let catalog = ArtsyClient::new(http, &settings.artsy.base_url, tokens)?;

    let sessions = SessionService::new(&settings.session)?;

    let app_state = AppState::new(
        Arc::new(PgUserStore::new(pool)),
        Arc::new(catalog),
        sessions,
    );

    // Start the web server
    let app = routes::create_app(app_state, &settings.server);

    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
