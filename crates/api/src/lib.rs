//! # SlotBook API
//!
//! The API crate provides the web server for the agency booking service.
//! Admins publish time slots; clients book and cancel them.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into manager calls and shape responses
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The slot and booking rules live in `slotbook-core`; persistence is
//! provided by `slotbook-db`.

/// Configuration module for API settings
pub mod config;
/// Request handlers for slots and bookings
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use slotbook_core::{
    booking_manager::BookingManager,
    business_time::BusinessTime,
    slot_manager::SlotManager,
    store::{BookingStore, SlotStore},
};
use slotbook_db::{DbPool, PgStore};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Slot creation, deletion and listing
    pub slots: SlotManager,
    /// Booking creation, cancellation and listing
    pub bookings: BookingManager,
    /// Business timezone used to render local dates and times
    pub time: BusinessTime,
}

impl ApiState {
    pub fn new(
        slot_store: Arc<dyn SlotStore>,
        booking_store: Arc<dyn BookingStore>,
        time: BusinessTime,
    ) -> Self {
        Self {
            slots: SlotManager::new(slot_store.clone(), time),
            bookings: BookingManager::new(slot_store, booking_store, time),
            time,
        }
    }

    /// State backed by one store implementing both traits.
    pub fn with_store<S>(store: Arc<S>, time: BusinessTime) -> Self
    where
        S: SlotStore + BookingStore + 'static,
    {
        Self::new(store.clone(), store, time)
    }
}

/// Builds the application router with all routes and the given state.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Time slot management endpoints
        .merge(routes::time_slot::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Installs the global tracing subscriber at the given level.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// Wires the Postgres store into the managers, applies tracing, timeout and
/// optional CORS layers, and serves until shutdown. Expects the tracing
/// subscriber to be installed already (see [`init_tracing`]).
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Create shared state with dependencies
    let store = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState::with_store(store, config.business_time));
    info!(timezone = %config.business_time.timezone().name(), "Business timezone configured");

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
