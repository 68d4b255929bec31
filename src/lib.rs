//! # Chat Widget Host
//!
//! Serves the embeddable chat widget to host pages during development and in
//! small deployments.
//!
//! ## Features
//!
//! - **Remote config**: the `[widget]` section of the TOML config is served as
//!   `widget-config.json`, the document the runtime fetches at startup
//! - **Bundle hosting**: the wasm-pack output of `chatwidget-runtime` under `/widget`
//! - **Demo page**: a bare host page embedding the widget
//! - **Validation**: widget configs are checked before they are served
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`api`]: HTTP server with Axum
//!
//! The widget itself lives in the `chatwidget-runtime` crate; its config types
//! are re-exported here.

pub mod api;
pub mod config;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    generate_default_config, AssetsConfig, Config, ConfigError, LogFormat, LoggingConfig,
    ServerConfig,
};

pub use chatwidget_runtime::{Severity, ValidationIssue, WidgetConfig};
