//! Chat Widget Runtime
//!
//! Embeddable chat launcher and panel for third-party host pages, compiled to
//! WebAssembly.
//!
//! # Features
//!
//! - Remote configuration with host-global and built-in fallbacks
//! - Stylesheet/script injection with a completion barrier for the host hook
//! - Responsive launcher placement (mobile breakpoint, custom label mode)
//! - Iframe panel state machine driven by load, animation-frame and
//!   `transitionend` events
//! - Cross-frame message bus for close requests and unread counts
//!
//! # Architecture
//!
//! Every state machine in this crate is plain Rust and talks to the page only
//! through the [`Surface`] trait, so the whole widget runs (and is tested)
//! natively. The browser implementation of [`Surface`] lives in `web` and is
//! compiled for `wasm32` only; it turns DOM callbacks into [`WidgetEvent`]s and
//! feeds them back to [`Widget::handle`].

pub mod assets;
pub mod badge;
pub mod config;
pub mod launcher;
pub mod messages;
pub mod panel;
pub mod surface;
pub mod trigger;
pub mod validate;
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{AssetLoadBarrier, AssetLoader};
pub use badge::UnreadBadge;
pub use config::{
    AssetSettings, BotConfig, ConfigLoadError, ConfigLoader, ConfigSource, Position, SliderStyle,
    Trigger, VisitorConfig, WidgetConfig,
};
pub use launcher::LauncherButton;
pub use messages::{InboundMessage, MessageBus};
pub use panel::{PanelController, PanelState};
pub use surface::{
    ClickTarget, FrameSpec, Glyph, LauncherContent, Node, PageEvent, Subscription, Surface,
    TaskId, Viewport,
};
pub use trigger::{TriggerBinder, TriggerPolicy, TriggerStatus};
pub use validate::{Severity, ValidationIssue};
pub use widget::{RuntimeOptions, Widget, WidgetEvent};
