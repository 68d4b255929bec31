//! Page Surface
//!
//! The seam between the widget's state machines and the host page. The browser
//! implementation lives in `crate::web`; tests use an in-memory recorder.
//!
//! Callbacks never run synchronously inside a `Surface` call. Anything the page
//! reports later (a click, a timer, a load event) comes back as the
//! [`WidgetEvent`] that was handed over when it was registered.

use crate::config::WidgetConfig;
use crate::widget::WidgetEvent;

/// Element id of the launcher button
pub const LAUNCHER_ID: &str = "chat-widget-launcher";
/// Element id of the unread badge (child of the launcher)
pub const BADGE_ID: &str = "chat-widget-badge";
/// Element id of the chat panel iframe
pub const PANEL_ID: &str = "chat-widget-panel";

/// Elements the widget owns or touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Launcher,
    Badge,
    Panel,
    /// `<body>` of the host page
    Body,
    /// `<html>` of the host page
    Root,
}

impl Node {
    /// DOM id for widget-owned nodes
    pub fn id(&self) -> Option<&'static str> {
        match self {
            Node::Launcher => Some(LAUNCHER_ID),
            Node::Badge => Some(BADGE_ID),
            Node::Panel => Some(PANEL_ID),
            Node::Body | Node::Root => None,
        }
    }
}

/// Current viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Mobile layout applies at or below the breakpoint
    pub fn is_mobile(&self, breakpoint_px: f64) -> bool {
        self.width <= breakpoint_px
    }
}

/// Attributes of the chat panel iframe
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub src: String,
    pub sandbox: &'static str,
    pub allow: &'static str,
}

/// Sandbox flags of the chat iframe
pub const FRAME_SANDBOX: &str =
    "allow-same-origin allow-scripts allow-forms allow-popups allow-popups-to-escape-sandbox";
/// Permission policy of the chat iframe
pub const FRAME_ALLOW: &str = "camera; microphone; geolocation";

impl FrameSpec {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            sandbox: FRAME_SANDBOX,
            allow: FRAME_ALLOW,
        }
    }
}

/// Element whose click toggles the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The widget's own launcher button
    Launcher,
    /// A host-page element, by id
    Element(String),
}

/// Icons the launcher can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Chat,
    Close,
}

/// What the launcher button displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherContent {
    Icon(Glyph),
    /// Display label, already truncated
    Label(String),
}

/// Page-level event streams the widget listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// `window` resize, delivered as [`WidgetEvent::Resize`]
    Resize,
    /// `window` orientationchange, delivered as [`WidgetEvent::OrientationChange`]
    OrientationChange,
    /// `window` message, delivered as [`WidgetEvent::Message`]
    Message,
}

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Listener registration that is removed when dropped
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the closure that unregisters the listener
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Everything the widget needs from the host page
pub trait Surface {
    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Create the launcher button and its badge
    fn mount_launcher(&mut self);

    /// Replace the launcher's icon or label
    fn set_launcher_content(&mut self, content: &LauncherContent);

    /// Create the panel iframe; its load events arrive as [`WidgetEvent::FrameLoaded`]
    fn create_panel(&mut self, frame: &FrameSpec);

    fn add_class(&mut self, node: Node, class: &str);

    fn remove_class(&mut self, node: Node, class: &str);

    /// Set an inline style property, or remove it when `value` is `None`
    fn set_style(&mut self, node: Node, property: &str, value: Option<&str>);

    fn set_text(&mut self, node: Node, text: &str);

    /// Append a `<link rel="stylesheet">`; completion is not reported
    fn inject_stylesheet(&mut self, name: &str, href: &str);

    /// Append a `<script>`; its load arrives as [`WidgetEvent::ScriptLoaded`]
    fn inject_script(&mut self, name: &str, src: &str);

    /// Call the host integration hook with the config. Returns `false` when
    /// the host page does not define one.
    fn invoke_host_hook(&mut self, config: &WidgetConfig) -> bool;

    /// Whether the host page currently has an element with this id
    fn element_exists(&self, id: &str) -> bool;

    /// Deliver [`WidgetEvent::Toggle`] on every click of the target
    fn bind_click(&mut self, target: &ClickTarget);

    /// Deliver `event` once after `delay_ms`
    fn schedule(&mut self, delay_ms: u32, event: WidgetEvent) -> TaskId;

    /// Cancel a scheduled event; unknown or fired tasks are ignored
    fn cancel(&mut self, task: TaskId);

    /// Deliver `event` on the next animation frame
    fn request_animation_frame(&mut self, event: WidgetEvent);

    /// Deliver `event` on the next `transitionend` of `node`, once
    fn once_transition_end(&mut self, node: Node, event: WidgetEvent);

    /// Start listening to a page event stream
    fn subscribe(&mut self, source: PageEvent) -> Subscription;
}
