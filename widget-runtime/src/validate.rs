//! Config Validation
//!
//! Static checks on a [`WidgetConfig`]. The runtime logs the findings and
//! carries on; the host server refuses to start on errors.

use serde::Serialize;
use std::fmt;

use crate::config::{Trigger, WidgetConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One finding about a config field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `settings.js.sdk`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", label, self.field, self.message)
    }
}

impl WidgetConfig {
    /// Check the config for values the runtime cannot use as intended
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !is_hex_color(&self.bot.button_color) {
            issues.push(ValidationIssue::error(
                "bot.buttonColor",
                format!("'{}' is not a #rgb, #rrggbb or #rrggbbaa colour", self.bot.button_color),
            ));
        }

        if let Trigger::Element(id) = &self.bot.trigger {
            if id.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    "bot.trigger",
                    "custom trigger id is blank",
                ));
            }
        }

        for (kind, assets) in [("css", &self.settings.css), ("js", &self.settings.js)] {
            for (name, url) in assets {
                let field = format!("settings.{}.{}", kind, name);
                if url.trim().is_empty() {
                    issues.push(ValidationIssue::error(field, "asset URL is blank"));
                } else if !is_loadable_url(url) {
                    issues.push(ValidationIssue::warning(
                        field,
                        format!("'{}' is neither an http(s) URL nor a path", url),
                    ));
                }
            }
        }

        if self.settings.js.is_empty() {
            issues.push(ValidationIssue::warning(
                "settings.js",
                "no scripts declared, the host init hook will never be called",
            ));
        }

        issues
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn is_loadable_url(url: &str) -> bool {
    url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with("//")
        || url.starts_with('/')
        || url.starts_with("./")
        || url.starts_with("../")
}
