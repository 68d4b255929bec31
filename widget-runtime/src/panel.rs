//! Panel Controller
//!
//! Lifecycle of the chat iframe:
//!
//! ```text
//! Closed --toggle (no frame)--> Opening --frame loaded--> Open
//! Closed --toggle (frame built)--------------------------> Open
//! Open --toggle/close, pop-----------------------------> Closed
//! Open --toggle/close, slider--> Closing --transitionend--> Closed
//! ```
//!
//! The iframe is created at most once per page. Toggles are ignored while the
//! frame loads and while a close transition runs. There is no timeout on the
//! frame's load event: if it never fires, the panel stays in `Opening`.

use crate::config::{Position, SliderStyle};
use crate::surface::{FrameSpec, Node, Surface, Viewport};
use crate::widget::WidgetEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    /// Iframe created, waiting for its first load event
    Opening,
    Open,
    /// Slider close transition running
    Closing,
}

/// Inline styles of the fullscreen mobile layout
const MOBILE_LAYOUT: [(&str, &str); 6] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100dvh"),
    ("z-index", "2147483647"),
];

#[derive(Debug)]
pub struct PanelController {
    state: PanelState,
    frame_built: bool,
    /// `open` class currently applied
    open_applied: bool,
    mobile_layout: bool,
    style: SliderStyle,
    position: Position,
    chat_url: String,
    breakpoint_px: f64,
}

impl PanelController {
    pub fn new(
        style: SliderStyle,
        position: Position,
        chat_url: impl Into<String>,
        breakpoint_px: f64,
    ) -> Self {
        Self {
            state: PanelState::Closed,
            frame_built: false,
            open_applied: false,
            mobile_layout: false,
            style,
            position,
            chat_url: chat_url.into(),
            breakpoint_px,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Frame built, loaded and shown. `Opening` does not count.
    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    pub fn frame_built(&self) -> bool {
        self.frame_built
    }

    /// User or host toggle. Returns the new state when it changed.
    pub fn toggle<S: Surface>(&mut self, surface: &mut S) -> Option<PanelState> {
        match self.state {
            PanelState::Closed if !self.frame_built => {
                surface.create_panel(&FrameSpec::new(self.chat_url.clone()));
                self.frame_built = true;
                tracing::info!("Chat panel created, waiting for load");
                self.enter(PanelState::Opening)
            }
            PanelState::Closed => {
                self.open(surface);
                self.enter(PanelState::Open)
            }
            PanelState::Opening => {
                tracing::debug!("Toggle ignored while the chat panel loads");
                None
            }
            PanelState::Open => self.begin_close(surface),
            PanelState::Closing => {
                tracing::debug!("Toggle ignored while the chat panel closes");
                None
            }
        }
    }

    /// Close request from the chat application
    pub fn close<S: Surface>(&mut self, surface: &mut S) -> Option<PanelState> {
        match self.state {
            PanelState::Open => self.begin_close(surface),
            state => {
                tracing::debug!("Close request ignored in state {:?}", state);
                None
            }
        }
    }

    /// The iframe fired `load`
    pub fn frame_loaded<S: Surface>(&mut self, surface: &mut S) -> Option<PanelState> {
        match self.state {
            PanelState::Opening => {
                self.open(surface);
                self.enter(PanelState::Open)
            }
            // Navigation inside the chat app reloads the frame
            state => {
                tracing::debug!("Frame load in state {:?} ignored", state);
                None
            }
        }
    }

    /// Animation frame scheduled by `open`
    pub fn animation_frame<S: Surface>(&mut self, surface: &mut S) {
        if self.state == PanelState::Open && !self.open_applied {
            surface.add_class(Node::Panel, "open");
            self.open_applied = true;
        }
    }

    /// One-shot `transitionend` after a slider close
    pub fn transition_end<S: Surface>(&mut self, surface: &mut S) -> Option<PanelState> {
        match self.state {
            PanelState::Closing => {
                self.finish_close(surface);
                self.enter(PanelState::Closed)
            }
            _ => None,
        }
    }

    /// Viewport changed; only matters while the panel is on screen
    pub fn relayout<S: Surface>(&mut self, surface: &mut S, viewport: Viewport) {
        if matches!(self.state, PanelState::Open | PanelState::Closing) {
            self.apply_viewport_layout(surface, viewport);
        }
    }

    fn enter(&mut self, next: PanelState) -> Option<PanelState> {
        tracing::debug!("Panel {:?} -> {:?}", self.state, next);
        self.state = next;
        Some(next)
    }

    fn open<S: Surface>(&mut self, surface: &mut S) {
        surface.add_class(Node::Panel, self.style.class());
        surface.add_class(Node::Panel, self.position.class());
        if self.style == SliderStyle::Slider {
            self.pin_slider(surface);
        }

        let viewport = surface.viewport();
        self.apply_viewport_layout(surface, viewport);

        // The class goes on in the next frame so the browser runs the transition
        surface.request_animation_frame(WidgetEvent::AnimationFrame);

        set_pull_to_refresh(surface, false);
    }

    fn begin_close<S: Surface>(&mut self, surface: &mut S) -> Option<PanelState> {
        // Without the `open` class there is no transition to wait for
        if self.style == SliderStyle::Slider && self.open_applied {
            surface.add_class(Node::Panel, "closing");
            surface.once_transition_end(Node::Panel, WidgetEvent::TransitionEnd);
            self.enter(PanelState::Closing)
        } else {
            self.finish_close(surface);
            self.enter(PanelState::Closed)
        }
    }

    fn finish_close<S: Surface>(&mut self, surface: &mut S) {
        surface.remove_class(Node::Panel, "open");
        surface.remove_class(Node::Panel, "closing");
        self.open_applied = false;
        set_pull_to_refresh(surface, true);
    }

    /// Full height against the configured edge
    fn pin_slider<S: Surface>(&self, surface: &mut S) {
        surface.set_style(Node::Panel, "top", Some("0"));
        surface.set_style(Node::Panel, "bottom", Some("0"));
        surface.set_style(Node::Panel, "height", Some("100%"));
        surface.set_style(Node::Panel, self.position.edge(), Some("0"));
        surface.set_style(Node::Panel, self.position.opposite_edge(), None);
    }

    fn apply_viewport_layout<S: Surface>(&mut self, surface: &mut S, viewport: Viewport) {
        if viewport.is_mobile(self.breakpoint_px) {
            for (property, value) in MOBILE_LAYOUT {
                surface.set_style(Node::Panel, property, Some(value));
            }
            self.mobile_layout = true;
        } else if self.mobile_layout {
            for (property, _) in MOBILE_LAYOUT {
                surface.set_style(Node::Panel, property, None);
            }
            self.mobile_layout = false;
            if self.style == SliderStyle::Slider {
                self.pin_slider(surface);
            }
        }
    }
}

/// `overscroll-behavior: none` on body and root stops pull-to-refresh while
/// the panel is open
fn set_pull_to_refresh<S: Surface>(surface: &mut S, enabled: bool) {
    let value = if enabled { None } else { Some("none") };
    surface.set_style(Node::Body, "overscroll-behavior", value);
    surface.set_style(Node::Root, "overscroll-behavior", value);
}
