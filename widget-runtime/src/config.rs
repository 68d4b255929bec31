//! Widget Configuration
//!
//! The configuration document served next to the host page, and the loader
//! that always produces one: remote JSON first, then the host page's global,
//! then built-in defaults.
//!
//! Parsing is lenient below the top level: a field with the wrong type or an
//! unknown value is logged and replaced by its default, so one bad entry does
//! not discard the rest of the document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Launcher text that selects the icon-only button
pub const DEFAULT_BUTTON_TEXT: &str = "Chat with us";
/// Launcher background colour when none is configured
pub const DEFAULT_BUTTON_COLOR: &str = "#2563eb";

/// Complete widget configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidgetConfig {
    pub bot: BotConfig,
    pub visitor: VisitorConfig,
    pub settings: AssetSettings,
}

/// Launcher and panel appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub button_text: String,
    pub button_color: String,
    pub slider_style: SliderStyle,
    pub position: Position,
    pub trigger: Trigger,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            button_color: DEFAULT_BUTTON_COLOR.to_string(),
            slider_style: SliderStyle::default(),
            position: Position::default(),
            trigger: Trigger::default(),
        }
    }
}

impl BotConfig {
    /// A custom text switches the launcher to label mode
    pub fn custom_text(&self) -> Option<&str> {
        let text = self.button_text.trim();
        if text.is_empty() || text == DEFAULT_BUTTON_TEXT {
            None
        } else {
            Some(self.button_text.as_str())
        }
    }
}

/// Panel style variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderStyle {
    /// Floating popup above the launcher, no close transition
    #[default]
    Pop,
    /// Full-height drawer pinned to the configured edge
    Slider,
}

impl SliderStyle {
    pub fn class(&self) -> &'static str {
        match self {
            SliderStyle::Pop => "pop",
            SliderStyle::Slider => "slider",
        }
    }
}

/// Screen corner the widget attaches to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[default]
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "bl")]
    BottomLeft,
}

impl Position {
    pub fn class(&self) -> &'static str {
        match self {
            Position::BottomRight => "position-br",
            Position::BottomLeft => "position-bl",
        }
    }

    /// CSS property of the attached edge
    pub fn edge(&self) -> &'static str {
        match self {
            Position::BottomRight => "right",
            Position::BottomLeft => "left",
        }
    }

    /// CSS property of the opposite edge
    pub fn opposite_edge(&self) -> &'static str {
        match self {
            Position::BottomRight => "left",
            Position::BottomLeft => "right",
        }
    }
}

/// What opens the panel: the launcher, or a host-page element id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Trigger {
    #[default]
    Default,
    Element(String),
}

impl From<String> for Trigger {
    fn from(value: String) -> Self {
        if value == "default" {
            Trigger::Default
        } else {
            Trigger::Element(value)
        }
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Default => "default".to_string(),
            Trigger::Element(id) => id,
        }
    }
}

/// Visitor tracking options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorConfig {
    pub enabled: bool,
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Extra bundles to load into the host page, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetSettings {
    pub css: BTreeMap<String, String>,
    pub js: BTreeMap<String, String>,
}

/// Why the remote configuration could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigLoadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(err: serde_json::Error) -> Self {
        ConfigLoadError::Parse(err.to_string())
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Remote,
    HostGlobals,
    Defaults,
}

impl WidgetConfig {
    /// Parse a configuration document. Only unparseable text or a non-object
    /// document is an error.
    pub fn from_json(text: &str) -> Result<Self, ConfigLoadError> {
        let value = parse_object(text)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Build the configuration used when the remote document is unusable.
    ///
    /// `globals` is the JSON form of the host page's fallback object, if any.
    /// Only its `bot` and `visitor` sections are used.
    pub fn fallback(globals: Option<&str>) -> (Self, ConfigSource) {
        let Some(text) = globals else {
            return (Self::default(), ConfigSource::Defaults);
        };

        match parse_object(text) {
            Ok(value) => {
                let mut section = Section::new("host globals", value);
                let mut config = Self::default();
                section.take("bot", &mut config.bot);
                section.take("visitor", &mut config.visitor);
                (config, ConfigSource::HostGlobals)
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed host fallback config: {}", e);
                (Self::default(), ConfigSource::Defaults)
            }
        }
    }
}

fn parse_object(text: &str) -> Result<Value, ConfigLoadError> {
    let value: Value = serde_json::from_str(text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ConfigLoadError::Parse(
            "expected a JSON object at the top level".to_string(),
        ))
    }
}

/// Fields of one config object, consumed one at a time
struct Section {
    name: String,
    fields: Map<String, Value>,
}

impl Section {
    fn new(name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        let fields = match value {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            other => {
                tracing::warn!("Ignoring {}: expected an object, got {}", name, other);
                Map::new()
            }
        };
        Self { name, fields }
    }

    fn read<'de, D: Deserializer<'de>>(name: &str, deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(name, Value::deserialize(deserializer)?))
    }

    /// Overwrite `slot` when the field is present and valid
    fn take<T: DeserializeOwned>(&mut self, key: &str, slot: &mut T) {
        match self.fields.remove(key) {
            None | Some(Value::Null) => {}
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => *slot = parsed,
                Err(e) => tracing::warn!("Ignoring {}.{}: {}", self.name, key, e),
            },
        }
    }

    /// Name to URL map, keeping only string entries
    fn take_urls(&mut self, key: &str) -> BTreeMap<String, String> {
        let name = format!("{}.{}", self.name, key);
        let entries = Section::new(name, self.fields.remove(key).unwrap_or(Value::Null));

        let mut urls = BTreeMap::new();
        for (asset, value) in entries.fields {
            match value {
                Value::String(url) => {
                    urls.insert(asset, url);
                }
                other => tracing::warn!(
                    "Ignoring {}.{}: expected a URL string, got {}",
                    entries.name,
                    asset,
                    other
                ),
            }
        }
        urls
    }
}

impl<'de> Deserialize<'de> for WidgetConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut section = Section::read("config", deserializer)?;
        let mut config = Self::default();
        section.take("bot", &mut config.bot);
        section.take("visitor", &mut config.visitor);
        section.take("settings", &mut config.settings);
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for BotConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut section = Section::read("bot", deserializer)?;
        let mut bot = Self::default();
        section.take("buttonText", &mut bot.button_text);
        section.take("buttonColor", &mut bot.button_color);
        section.take("sliderStyle", &mut bot.slider_style);
        section.take("position", &mut bot.position);
        section.take("trigger", &mut bot.trigger);
        Ok(bot)
    }
}

impl<'de> Deserialize<'de> for VisitorConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut section = Section::read("visitor", deserializer)?;
        let mut visitor = Self::default();
        section.take("enabled", &mut visitor.enabled);
        Ok(visitor)
    }
}

impl<'de> Deserialize<'de> for AssetSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut section = Section::read("settings", deserializer)?;
        Ok(Self {
            css: section.take_urls("css"),
            js: section.take_urls("js"),
        })
    }
}

/// Turns the outcome of the config fetch into a usable configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Well-known location of the config document, relative to the host page
    pub const CONFIG_PATH: &'static str = "./widget-config.json";

    /// Never fails: any fetch or parse error falls back to host globals or
    /// defaults.
    pub fn resolve(
        fetched: Result<String, ConfigLoadError>,
        globals: Option<&str>,
    ) -> (WidgetConfig, ConfigSource) {
        let error = match fetched.and_then(|body| WidgetConfig::from_json(&body)) {
            Ok(config) => {
                tracing::info!("Loaded widget config from {}", Self::CONFIG_PATH);
                return (config, ConfigSource::Remote);
            }
            Err(e) => e,
        };

        let (config, source) = WidgetConfig::fallback(globals);
        tracing::warn!(
            "Widget config unavailable ({}), using {:?} fallback",
            error,
            source
        );
        (config, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_parses() {
        let json = r##"{
            "bot": {
                "buttonText": "Need help?",
                "buttonColor": "#ff0000",
                "sliderStyle": "slider",
                "position": "bl",
                "trigger": "open-chat"
            },
            "visitor": { "enabled": false },
            "settings": {
                "css": { "theme": "https://cdn.example.com/theme.css" },
                "js": { "sdk": "https://cdn.example.com/sdk.js" }
            }
        }"##;

        let config = WidgetConfig::from_json(json).unwrap();
        assert_eq!(config.bot.custom_text(), Some("Need help?"));
        assert_eq!(config.bot.slider_style, SliderStyle::Slider);
        assert_eq!(config.bot.position, Position::BottomLeft);
        assert_eq!(config.bot.trigger, Trigger::Element("open-chat".to_string()));
        assert!(!config.visitor.enabled);
        assert_eq!(config.settings.js.len(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let config = WidgetConfig::from_json(r#"{"bot": {"position": "bl"}}"#).unwrap();
        assert_eq!(config.bot.position, Position::BottomLeft);
        assert_eq!(config.bot.button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(config.bot.trigger, Trigger::Default);
        assert!(config.visitor.enabled);
        assert!(config.settings.css.is_empty());
    }

    #[test]
    fn test_default_text_is_not_custom() {
        let mut bot = BotConfig::default();
        assert_eq!(bot.custom_text(), None);
        bot.button_text = "   ".to_string();
        assert_eq!(bot.custom_text(), None);
    }

    #[test]
    fn test_trigger_serializes_as_plain_string() {
        let bot = BotConfig {
            trigger: Trigger::Element("help-link".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&bot).unwrap();
        assert_eq!(value["trigger"], "help-link");
        assert_eq!(value["sliderStyle"], "pop");
        assert_eq!(value["position"], "br");
    }

    #[test]
    fn test_resolve_network_error_uses_host_globals() {
        let globals = r#"{"bot": {"buttonText": "Ask us", "position": "bl"}}"#;
        let (config, source) = ConfigLoader::resolve(
            Err(ConfigLoadError::Network("offline".to_string())),
            Some(globals),
        );

        assert_eq!(source, ConfigSource::HostGlobals);
        assert_eq!(config.bot.button_text, "Ask us");
        assert_eq!(config.bot.position, Position::BottomLeft);
        assert!(config.settings.js.is_empty());
    }

    #[test]
    fn test_resolve_non_json_body_uses_defaults() {
        let (config, source) =
            ConfigLoader::resolve(Ok("<html>404</html>".to_string()), None);
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_resolve_malformed_globals_uses_defaults() {
        let (config, source) =
            ConfigLoader::resolve(Err(ConfigLoadError::Status(500)), Some("[1, 2]"));
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_resolve_keeps_document_with_bad_fields() {
        let body = r#"{
            "bot": {"buttonText": null, "sliderStyle": "slider", "position": "tr"},
            "visitor": {"enabled": "yes"},
            "settings": {"js": {"sdk": "/sdk.js", "broken": 42}}
        }"#;
        let (config, source) = ConfigLoader::resolve(Ok(body.to_string()), None);

        assert_eq!(source, ConfigSource::Remote);
        assert_eq!(config.bot.button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(config.bot.slider_style, SliderStyle::Slider);
        assert_eq!(config.bot.position, Position::BottomRight);
        assert!(config.visitor.enabled);
        assert_eq!(config.settings.js.len(), 1);
        assert_eq!(config.settings.js["sdk"], "/sdk.js");
    }

    #[test]
    fn test_section_of_wrong_type_defaults() {
        let config =
            WidgetConfig::from_json(r#"{"bot": "pop", "settings": {"css": {"a": "/a.css"}}}"#)
                .unwrap();
        assert_eq!(config.bot, BotConfig::default());
        assert_eq!(config.settings.css["a"], "/a.css");
    }

    #[test]
    fn test_non_object_document_falls_back() {
        let (_, source) = ConfigLoader::resolve(Ok("[1, 2]".to_string()), None);
        assert_eq!(source, ConfigSource::Defaults);

        let (_, source) = ConfigLoader::resolve(Ok("null".to_string()), None);
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_host_globals_ignore_settings() {
        let globals = r#"{"bot": {"position": "bl"}, "settings": {"js": {"x": "/x.js"}}}"#;
        let (config, source) = WidgetConfig::fallback(Some(globals));
        assert_eq!(source, ConfigSource::HostGlobals);
        assert_eq!(config.bot.position, Position::BottomLeft);
        assert!(config.settings.js.is_empty());
    }
}
