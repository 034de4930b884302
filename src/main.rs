use media_relay::{
    adapters::{
        router::{build_router, cors_layer},
        state::AppState,
    },
    domain::config::ServerConfig,
    services,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting media-relay for cloud '{}' (folder '{}')",
        config.provider.cloud_name,
        config.provider.folder
    );

    let provider = match services::create_media_provider(&config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("Failed to create media provider: {}", e);
            std::process::exit(1);
        }
    };

    if config.cors_allowed_origins.is_none() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins");
    }
    let cors = cors_layer(config.cors_allowed_origins.as_deref());

    let app_state = AppState::new(provider, config.provider.folder.clone());
    let router = build_router(app_state, cors);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
