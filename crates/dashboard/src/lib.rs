//! Bus Monitor Dashboard
//!
//! Kiosk-side monitor for one tracked bus: the stream session that renders
//! telemetry and hazard notifications, and an HTTP status API exposing the
//! dashboard view.

mod error;
mod routes;
mod session;
mod settings;
mod sink;

pub use error::DashboardError;
pub use session::{FrameStats, MonitorSession};
pub use settings::MonitorConfig;
pub use sink::{DashboardView, Notification, PresentationSink, SharedDashboard};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Application state shared across handlers
pub struct AppState {
    /// Dashboard view rendered by the session
    pub dashboard: SharedDashboard,
    /// Frame counters of the session
    pub stats: Arc<FrameStats>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(dashboard: SharedDashboard, stats: Arc<FrameStats>) -> Self {
        Self {
            dashboard,
            stats,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub bus_id: String,
    /// Stream link is up
    pub connected: bool,
    pub open_notifications: usize,
    pub frames_received: u64,
    /// Frames addressed to the tracked bus
    pub frames_routed: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/dashboard", get(routes::dashboard::get_dashboard))
        .route(
            "/api/v1/notifications/:id/dismiss",
            post(routes::notifications::dismiss),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let view = state.dashboard.view();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: if view.connected { "healthy" } else { "stale" }.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        bus_id: view.bus_id,
        connected: view.connected,
        open_notifications: view.notifications.len(),
        frames_received: state.stats.received(),
        frames_routed: state.stats.routed(),
    })
}

/// Initialize logging
pub fn init_logging(level: &str, json: bool) -> Result<(), DashboardError> {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| DashboardError::Logging(e.to_string()))
}

/// Serve the status API until the listener fails
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), DashboardError> {
    let app = create_router(state);

    info!("Starting status API on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
