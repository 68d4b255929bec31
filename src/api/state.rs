//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chatwidget_runtime::ValidationIssue;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Findings of the widget config, computed once at startup
    pub issues: Arc<Vec<ValidationIssue>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Wall-clock start time reported by `/health`
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let issues = config.validate();
        Self {
            config: Arc::new(config),
            issues: Arc::new(issues),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Whether the widget bundle directory is present
    pub fn assets_available(&self) -> bool {
        self.config.assets.dir.is_dir()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }
}
