//! Launcher Button
//!
//! Renders the toggle control and places it for the current viewport.

use crate::config::{BotConfig, Position, Trigger};
use crate::surface::{Glyph, LauncherContent, Node, Surface, Viewport};

/// Display labels longer than this are cut and get an ellipsis
pub const LABEL_MAX_CHARS: usize = 15;

const DESKTOP_OFFSET: &str = "24px";
const MOBILE_OFFSET: &str = "16px";

/// Truncate a custom button text for display; the config keeps the full text
pub fn display_label(text: &str) -> String {
    if text.chars().count() > LABEL_MAX_CHARS {
        let mut label: String = text.chars().take(LABEL_MAX_CHARS).collect();
        label.push('…');
        label
    } else {
        text.to_string()
    }
}

/// Inline placement of the launcher. `None` clears a property left over from
/// a previous layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub top: Option<&'static str>,
    pub bottom: Option<&'static str>,
    pub left: Option<&'static str>,
    pub right: Option<&'static str>,
    pub transform: Option<&'static str>,
}

impl Placement {
    fn declarations(&self) -> [(&'static str, Option<&'static str>); 5] {
        [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
            ("transform", self.transform),
        ]
    }
}

/// The widget's own toggle control
#[derive(Debug, Clone)]
pub struct LauncherButton {
    label: Option<String>,
    color: String,
    position: Position,
    hidden: bool,
}

impl LauncherButton {
    pub fn new(bot: &BotConfig) -> Self {
        Self {
            label: bot.custom_text().map(display_label),
            color: bot.button_color.clone(),
            position: bot.position,
            // A host-page trigger replaces the launcher
            hidden: matches!(bot.trigger, Trigger::Element(_)),
        }
    }

    /// Icon or label for the given panel state
    pub fn content(&self, open: bool) -> LauncherContent {
        match (&self.label, open) {
            (_, true) => LauncherContent::Icon(Glyph::Close),
            (Some(label), false) => LauncherContent::Label(label.clone()),
            (None, false) => LauncherContent::Icon(Glyph::Chat),
        }
    }

    /// Where the launcher sits for this viewport
    pub fn placement(&self, viewport: Viewport, breakpoint_px: f64) -> Placement {
        // A labelled launcher sits vertically centred on its edge on every screen
        if self.label.is_some() {
            let mut placement = Placement {
                top: Some("50%"),
                bottom: None,
                left: None,
                right: None,
                transform: Some("translateY(-50%)"),
            };
            set_edge(&mut placement, self.position, "0");
            return placement;
        }

        let offset = if viewport.is_mobile(breakpoint_px) {
            MOBILE_OFFSET
        } else {
            DESKTOP_OFFSET
        };
        let mut placement = Placement {
            top: None,
            bottom: Some(offset),
            left: None,
            right: None,
            transform: None,
        };
        set_edge(&mut placement, self.position, offset);
        placement
    }

    /// Mount and style the launcher
    pub fn render<S: Surface>(&self, surface: &mut S, breakpoint_px: f64) {
        surface.mount_launcher();
        surface.add_class(Node::Launcher, "chat-button");
        surface.add_class(Node::Launcher, self.position.class());
        surface.set_style(Node::Launcher, "background-color", Some(&self.color));
        if self.hidden {
            surface.set_style(Node::Launcher, "display", Some("none"));
        }
        surface.set_launcher_content(&self.content(false));
        let viewport = surface.viewport();
        self.relayout(surface, viewport, breakpoint_px);
    }

    /// Reflect the panel state in the icon/label
    pub fn set_open<S: Surface>(&self, surface: &mut S, open: bool) {
        surface.set_launcher_content(&self.content(open));
    }

    pub fn relayout<S: Surface>(&self, surface: &mut S, viewport: Viewport, breakpoint_px: f64) {
        let placement = self.placement(viewport, breakpoint_px);
        for (property, value) in placement.declarations() {
            surface.set_style(Node::Launcher, property, value);
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

fn set_edge(placement: &mut Placement, position: Position, value: &'static str) {
    match position {
        Position::BottomLeft => placement.left = Some(value),
        Position::BottomRight => placement.right = Some(value),
    }
}
