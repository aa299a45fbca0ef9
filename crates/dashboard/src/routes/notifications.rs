//! Notification Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Dismiss an open notification
pub async fn dismiss(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> StatusCode {
    if state.dashboard.dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
