use axum::http::{header::CACHE_CONTROL, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod integrations;
mod models;
mod services;
mod utils;

use config::Config;
use constants::{API_VERSION, NO_STORE_CACHE_CONTROL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fan_reward_frame=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Fan Token Reward Frame");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    tracing::info!("Frame URL: {}", config.frame_url());
    if !config.is_production() {
        tracing::info!("Non-production mode; frame links point at {}", config.public_url);
    }

    let app_state = api::AppState::from_config(config.clone())?;
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);
    let base_path = state.config.frame_base_path.trim().trim_matches('/').to_string();

    let frames = Router::new()
        // Screens
        .route("/", get(api::frames::home).post(api::frames::home))
        .route(
            "/search-user-channel",
            post(api::frames::search_user_channel),
        )
        .route(
            "/check-moxie-amount/{symbol}",
            post(api::frames::check_moxie_amount),
        )
        .route("/share-amount/{symbol}", post(api::frames::share_amount))
        .route(
            "/share-by-user/{symbol}/{burned}",
            get(api::frames::share_by_user).post(api::frames::share_by_user),
        )
        // Transactions
        .route("/approve", post(api::transactions::approve))
        .route(
            "/buy-n-burn-all/{subject}",
            post(api::transactions::buy_and_burn_all),
        )
        .route(
            "/buy-n-burn-selected/{subject}",
            post(api::transactions::buy_and_burn_selected),
        )
        // Images
        .route("/img-home", get(api::images::home))
        .route(
            "/img-seach-user-channel/{symbol}",
            get(api::images::search_result),
        )
        .route(
            "/img-moxie-amount/{balance}/{usd}",
            get(api::images::moxie_amount),
        )
        .route("/img-share/{symbol}/{burned}", get(api::images::share))
        .route("/img-waiting", get(api::images::waiting))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_STORE_CACHE_CONTROL),
        ));

    let router = Router::new().route("/health", get(api::health::health_check));
    let router = if base_path.is_empty() {
        router.merge(frames)
    } else {
        router.nest(&format!("/{}", base_path), frames)
    };

    router
        .layer(TraceLayer::new_for_http())
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
