//! Widget Config Route
//!
//! - GET /widget-config.json - The `[widget]` section in the shape the
//!   runtime fetches at startup

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::state::AppState;

/// GET /widget-config.json
///
/// Served uncached so edits show up on the next page load.
pub async fn widget_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Json(state.config.widget.clone()),
    )
}
