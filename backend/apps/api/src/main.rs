//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are
//! `auth::AuthError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::domain::repository::TokenStore;
use auth::{
    AuthAppState, AuthServices, LogMailer, MemoryTokenStore, PgCredentialStore, RedisTokenStore,
    TimeoutStore, auth_router_generic,
};
use axum::http::{HeaderValue, Method, header};
use platform::rate_limit::RateLimitStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ServerConfig, TokenStoreKind};

const MEMORY_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(environment = ?config.environment, auth = ?config.auth, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.auth.store_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../database/migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    let store_timeout = config.auth.store_timeout;
    let users = Arc::new(TimeoutStore::new(PgCredentialStore::new(pool), store_timeout));
    let services = Arc::new(AuthServices::new(
        config.auth.clone(),
        Arc::new(LogMailer::new(config.frontend_url.clone())),
    )?);

    match &config.token_store {
        TokenStoreKind::Redis(url) => {
            let tokens = RedisTokenStore::connect(url, store_timeout).await?;
            tracing::info!("Connected to Redis");

            let state = AuthAppState {
                users,
                tokens: Arc::new(TimeoutStore::new(tokens, store_timeout)),
                services,
            };
            serve(&config, state).await
        }
        TokenStoreKind::Memory => {
            tracing::warn!("Using in-memory token store; tokens are lost on restart");

            let tokens = Arc::new(MemoryTokenStore::new());
            let purged = tokens.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(MEMORY_PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    purged.purge_expired();
                }
            });

            let state = AuthAppState {
                users,
                tokens,
                services,
            };
            serve(&config, state).await
        }
    }
}

async fn serve<T>(
    config: &ServerConfig,
    state: AuthAppState<TimeoutStore<PgCredentialStore>, T>,
) -> anyhow::Result<()>
where
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let allowed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = auth_router_generic(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
