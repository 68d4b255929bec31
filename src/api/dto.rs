//! Data Transfer Objects
//!
//! Response types for the API endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Application version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// When the server started
    pub started_at: DateTime<Utc>,
    /// Whether the widget bundle directory exists
    pub assets_available: bool,
    /// Widget config findings
    pub widget_config: ValidationSummary,
}

/// Counts of validation issues in the served widget config
#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub errors: usize,
    pub warnings: usize,
}
