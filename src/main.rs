//! Club events server binary.
//!
//! Loads configuration, connects to PostgreSQL, picks the payment
//! gateway (real Razorpay when credentials are configured, the offline
//! demo gateway otherwise), and serves the API.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use club_events::adapters::http::{api_router, AppState};
use club_events::adapters::identity::ProxyHeaderIdentity;
use club_events::adapters::notify::LogNotifier;
use club_events::adapters::postgres::{PostgresEventStore, PostgresRegistrationStore};
use club_events::adapters::razorpay::{OfflineGateway, RazorpayConfig, RazorpayGateway};
use club_events::config::AppConfig;
use club_events::ports::PaymentGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        info!("Migrations applied");
    }

    let gateway: Arc<dyn PaymentGateway> = match (
        &config.payment.razorpay_key_id,
        &config.payment.razorpay_key_secret,
    ) {
        (Some(key_id), Some(key_secret)) => {
            info!(test_mode = config.payment.is_test_mode(), "Razorpay gateway enabled");
            let gateway_config = RazorpayConfig::new(key_id, key_secret)
                .with_http_timeout(Duration::from_secs(config.payment.http_timeout_secs));
            Arc::new(RazorpayGateway::new(gateway_config)?)
        }
        _ => {
            warn!("No gateway credentials configured; running with the offline demo gateway");
            Arc::new(OfflineGateway)
        }
    };

    let state = AppState::new(
        Arc::new(PostgresEventStore::new(pool.clone())),
        Arc::new(PostgresRegistrationStore::new(pool)),
        Arc::new(ProxyHeaderIdentity),
        gateway,
        Arc::new(LogNotifier),
        config.payment.currency.clone(),
        config.payment.capture_timeout_secs,
    );

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    };

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
