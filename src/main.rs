mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use crate::db::{db::DBClient, store::MarketplaceStore};
use service::{
    notification_service::NotificationService,
    outbox::{start_outbox_worker, NotificationOutbox},
    ticket_service::TicketService,
    verdict_service::VerdictService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub outbox: Arc<NotificationOutbox>,
    // Services
    pub notification_service: Arc<NotificationService>,
    pub ticket_service: Arc<TicketService>,
    pub verdict_service: Arc<VerdictService>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketplaceStore>, config: Config) -> Self {
        let outbox = Arc::new(NotificationOutbox::new(
            store.clone(),
            config.outbox_max_attempts,
            Duration::from_millis(config.outbox_retry_backoff_ms),
        ));
        let notification_service = Arc::new(NotificationService::new(store.clone(), outbox.clone()));

        let ticket_service = Arc::new(TicketService::new(
            store.clone(),
            notification_service.clone(),
            chrono::Duration::hours(config.dispute_response_hours),
        ));

        let verdict_service = Arc::new(VerdictService::new(
            store,
            notification_service.clone(),
        ));

        Self {
            env: config,
            outbox,
            notification_service,
            ticket_service,
            verdict_service,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    dotenv().ok();

    let config = Config::init()?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    tracing::info!("✅ Connection to the database is successful!");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let allowed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let store: Arc<dyn MarketplaceStore> = Arc::new(DBClient::new(pool));
    let app_state = Arc::new(AppState::new(store, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tokio::spawn(start_outbox_worker(
        app_state.outbox.clone(),
        Duration::from_secs(config.outbox_flush_interval_secs.max(1)),
    ));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
