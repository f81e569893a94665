use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use slotbook::config::AppConfig;
use slotbook::db;
use slotbook::handlers;
use slotbook::services::notifications::email::HttpEmailProvider;
use slotbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let notifier = HttpEmailProvider::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
        config.email_from.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier: Arc::new(notifier),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/available-slots",
            get(handlers::slots::available_slots),
        )
        .route(
            "/api/providers/:id/availability",
            get(handlers::availability::list_provider_windows),
        )
        .route(
            "/api/availability",
            get(handlers::availability::list_windows),
        )
        .route(
            "/api/availability",
            post(handlers::availability::create_window),
        )
        .route(
            "/api/availability/:id",
            put(handlers::availability::update_window),
        )
        .route(
            "/api/availability/:id",
            delete(handlers::availability::delete_window),
        )
        .route("/api/services", get(handlers::services::list_services))
        .route("/api/services", post(handlers::services::create_service))
        .route("/api/services/:id", put(handlers::services::update_service))
        .route(
            "/api/services/:id",
            delete(handlers::services::deactivate_service),
        )
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/provider",
            post(handlers::bookings::create_provider_booking),
        )
        .route(
            "/api/bookings/:id/status",
            patch(handlers::bookings::update_booking_status),
        )
        .route(
            "/api/customers/search",
            get(handlers::customers::search_customers),
        )
        .route("/api/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/api/dashboard/revenue-chart",
            get(handlers::dashboard::revenue_chart),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
