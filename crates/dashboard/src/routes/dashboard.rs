//! Dashboard Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::sink::DashboardView;
use crate::AppState;

/// Get the current dashboard view
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.view())
}
