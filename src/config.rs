//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The `[widget]` section is the document served to host pages as
//! `widget-config.json`, written in TOML form.

use chatwidget_runtime::{Severity, ValidationIssue, WidgetConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub widget: WidgetConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins, any origin when empty
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Widget bundle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// wasm-pack output directory, served under `/widget`
    #[serde(default = "default_assets_dir")]
    pub dir: PathBuf,

    /// Name of the JS glue module inside `dir`
    #[serde(default = "default_entry")]
    pub entry: String,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./widget-runtime/pkg")
}

fn default_entry() -> String {
    "chatwidget_runtime.js".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
            entry: default_entry(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("chatwidget").join("config.toml")),
            Some(PathBuf::from("/etc/chatwidget/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Validation issues of the `[widget]` section
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.widget.validate()
    }

    /// Fail on any error-level validation issue
    pub fn ensure_valid(&self) -> Result<Vec<ValidationIssue>, ConfigError> {
        let issues = self.validate();
        let errors: Vec<String> = issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .map(ToString::to_string)
            .collect();

        if errors.is_empty() {
            Ok(issues)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("CHATWIDGET_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CHATWIDGET_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid CHATWIDGET_PORT '{}'", port),
            }
        }

        // Asset overrides
        if let Some(dir) = lookup("CHATWIDGET_ASSETS_DIR") {
            self.assets.dir = PathBuf::from(dir);
        }

        // Logging overrides
        if let Some(level) = lookup("CHATWIDGET_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CHATWIDGET_LOG_FORMAT") {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => tracing::warn!("Ignoring CHATWIDGET_LOG_FORMAT: {}", e),
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid widget config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Chat Widget Configuration
#
# Environment variables override these settings:
# - CHATWIDGET_HOST
# - CHATWIDGET_PORT
# - CHATWIDGET_ASSETS_DIR
# - CHATWIDGET_LOG_LEVEL
# - CHATWIDGET_LOG_FORMAT

[server]
# Host to bind to
host = "0.0.0.0"

# Port to listen on
port = 8090

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[assets]
# wasm-pack output directory, served under /widget
dir = "./widget-runtime/pkg"

# JS glue module loaded by the demo page
entry = "chatwidget_runtime.js"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Everything below is served to host pages as /widget-config.json

[widget.bot]
# Launcher label; anything other than "Chat with us" switches to label mode
buttonText = "Chat with us"

# Launcher background colour (#rgb, #rrggbb or #rrggbbaa)
buttonColor = "#2563eb"

# Panel presentation: pop or slider
sliderStyle = "pop"

# Screen corner: br (bottom-right) or bl (bottom-left)
position = "br"

# "default" uses the launcher, anything else is the id of a host element
trigger = "default"

[widget.visitor]
enabled = true

# Stylesheets and scripts injected into the host page.
# The host's ChatWidget.init(config) runs once every script has loaded.
[widget.settings.css]
# theme = "/widget/theme.css"

[widget.settings.js]
# sdk = "https://cdn.example.com/chat-sdk.js"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwidget_runtime::{Position, SliderStyle, Trigger};
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.widget, WidgetConfig::default());
    }

    #[test]
    fn test_widget_section() {
        let config = Config::parse(
            r##"
            [widget.bot]
            buttonText = "Help"
            buttonColor = "#ff0000"
            sliderStyle = "slider"
            position = "bl"
            trigger = "help-link"

            [widget.settings.js]
            sdk = "/sdk.js"
            "##,
        )
        .unwrap();

        let bot = &config.widget.bot;
        assert_eq!(bot.button_text, "Help");
        assert_eq!(bot.slider_style, SliderStyle::Slider);
        assert_eq!(bot.position, Position::BottomLeft);
        assert_eq!(bot.trigger, Trigger::Element("help-link".to_string()));
        assert_eq!(config.widget.settings.js.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CHATWIDGET_PORT", "9000"),
            ("CHATWIDGET_ASSETS_DIR", "/srv/widget"),
            ("CHATWIDGET_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.assets.dir, PathBuf::from("/srv/widget"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "CHATWIDGET_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 8090);
    }

    #[test]
    fn test_ensure_valid_rejects_errors() {
        let mut config = Config::default();
        config.widget.bot.button_color = "blue".to_string();

        let err = config.ensure_valid().unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("buttonColor"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_valid_keeps_warnings() {
        // Default widget has no scripts, which is only a warning
        let issues = Config::default().ensure_valid().unwrap();
        assert!(issues.iter().all(|i| !i.is_error()));
        assert!(!issues.is_empty());
    }
}
