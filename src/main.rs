use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod chain;
mod config;
mod constants;
mod error;
mod models;
mod services;
mod websocket;

use config::Config;
use constants::API_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redeemer_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Redeemer Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    tracing::info!("Chain id: {}", config.chain_id);
    tracing::info!(
        "Known extensions: ERC-1155 {}, ERC-721 {}",
        constants::BURN_REDEEM_EXTENSION_ERC1155,
        constants::BURN_REDEEM_EXTENSION_ERC721
    );

    // Chain clients
    let reader: Arc<dyn chain::ChainReader> = Arc::new(chain::EvmReader::from_config(&config)?);
    let invoker = chain::EvmInvoker::from_config(&config)?
        .map(|invoker| Arc::new(invoker) as Arc<dyn chain::ChainInvoker>);
    if let Some(invoker) = &invoker {
        tracing::info!("Signer wallet: {:#x}", invoker.signer_address());
    }

    // Services
    let metadata = Arc::new(services::MetadataResolver::from_config(&config)?);
    let catalog = Arc::new(services::CatalogService::new(
        reader.clone(),
        metadata,
        &config,
    ));
    let balances = Arc::new(services::BalanceAggregator::new(reader.clone()));
    let executor = Arc::new(services::RedeemExecutor::new(
        reader.clone(),
        invoker,
        &config,
    ));
    let session = Arc::new(RwLock::new(services::RedeemSession::new()));

    let app_state = api::AppState {
        config: config.clone(),
        reader,
        catalog,
        balances,
        executor,
        session,
    };

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Campaign catalog
        .route(
            "/api/v1/campaigns/{creator}/{extension}",
            get(api::campaigns::get_campaigns),
        )
        // Selection session
        .route("/api/v1/session", get(api::session::get_session))
        .route(
            "/api/v1/session/select",
            post(api::session::select_campaign),
        )
        .route(
            "/api/v1/session/deselect",
            post(api::session::deselect_campaign),
        )
        .route(
            "/api/v1/session/select-all",
            post(api::session::select_all_campaigns),
        )
        .route("/api/v1/session/clear", post(api::session::clear_selection))
        // Batch redemption
        .route(
            "/api/v1/redeem/execute",
            post(api::redeem::execute_redemptions),
        )
        .route("/api/v1/redeem/status", get(api::redeem::get_status))
        .route("/api/v1/redeem/dismiss", post(api::redeem::dismiss_run))
        // WebSocket endpoints
        .route("/ws/redeem", get(websocket::redeem::handler))
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
