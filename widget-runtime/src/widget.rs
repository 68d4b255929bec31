//! Widget Orchestrator
//!
//! Owns every component and the page subscriptions, and routes each
//! [`WidgetEvent`] to the component it concerns.

use crate::assets::AssetLoader;
use crate::badge::UnreadBadge;
use crate::config::WidgetConfig;
use crate::launcher::LauncherButton;
use crate::messages::{InboundMessage, MessageBus};
use crate::panel::{PanelController, PanelState};
use crate::surface::{PageEvent, Subscription, Surface, TaskId};
use crate::trigger::{TriggerBinder, TriggerPolicy};

/// Default chat application loaded into the panel
pub const DEFAULT_CHAT_URL: &str = "https://chat.helpdesk.example.com/widget";

/// Everything the page reports back to the widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Launcher/trigger click or the exported `toggle()`
    Toggle,
    /// Panel iframe fired `load`
    FrameLoaded,
    /// Animation frame requested when opening
    AnimationFrame,
    /// Panel `transitionend` after a slider close
    TransitionEnd,
    /// An injected script fired `load`
    ScriptLoaded { name: String },
    /// Window `message`, payload in JSON form
    Message { data: String, origin: String },
    Resize,
    OrientationChange,
    /// Orientation change delay elapsed
    OrientationSettled,
    /// Badge pulse animation finished
    PulseExpired,
    /// Next lookup for a host-page trigger
    TriggerPoll,
    /// Tear the widget down
    Dispose,
}

/// Tunables of the runtime
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub chat_url: String,
    pub mobile_breakpoint_px: f64,
    /// Delay before relayout after an orientation change
    pub orientation_delay_ms: u32,
    pub pulse_ms: u32,
    pub trigger: TriggerPolicy,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            mobile_breakpoint_px: 768.0,
            orientation_delay_ms: 100,
            pulse_ms: 600,
            trigger: TriggerPolicy::default(),
        }
    }
}

/// The running widget on one page
pub struct Widget<S: Surface> {
    surface: S,
    config: WidgetConfig,
    options: RuntimeOptions,
    launcher: LauncherButton,
    badge: UnreadBadge,
    panel: PanelController,
    assets: AssetLoader,
    trigger: TriggerBinder,
    bus: MessageBus,
    listeners: Vec<Subscription>,
    orientation_task: Option<TaskId>,
    disposed: bool,
}

impl<S: Surface> Widget<S> {
    /// Initialize the widget on the page. Called exactly once, after the
    /// config has been resolved.
    pub fn start(config: WidgetConfig, options: RuntimeOptions, surface: S) -> Self {
        for issue in config.validate() {
            tracing::warn!("Widget config {}", issue);
        }

        let bot = &config.bot;
        let mut widget = Self {
            launcher: LauncherButton::new(bot),
            badge: UnreadBadge::new(),
            panel: PanelController::new(
                bot.slider_style,
                bot.position,
                options.chat_url.clone(),
                options.mobile_breakpoint_px,
            ),
            assets: AssetLoader::new(),
            trigger: TriggerBinder::new(bot.trigger.clone(), options.trigger),
            bus: MessageBus::new(),
            listeners: Vec::new(),
            orientation_task: None,
            disposed: false,
            surface,
            config,
            options,
        };

        widget.assets.start(&widget.config, &mut widget.surface);
        widget
            .launcher
            .render(&mut widget.surface, widget.options.mobile_breakpoint_px);
        widget.badge.render(&mut widget.surface);

        widget
            .listeners
            .push(widget.surface.subscribe(PageEvent::Resize));
        widget
            .listeners
            .push(widget.surface.subscribe(PageEvent::OrientationChange));
        widget.bus.attach(&mut widget.surface);

        widget.trigger.start(&mut widget.surface);

        tracing::info!(
            "Chat widget started ({} style, {})",
            widget.config.bot.slider_style.class(),
            widget.config.bot.position.class()
        );
        widget
    }

    /// Process one page event
    pub fn handle(&mut self, event: WidgetEvent) {
        if self.disposed {
            tracing::debug!("Widget disposed, dropping {:?}", event);
            return;
        }

        match event {
            WidgetEvent::Toggle => {
                let changed = self.panel.toggle(&mut self.surface);
                self.after_transition(changed);
            }
            WidgetEvent::FrameLoaded => {
                let changed = self.panel.frame_loaded(&mut self.surface);
                self.after_transition(changed);
            }
            WidgetEvent::AnimationFrame => self.panel.animation_frame(&mut self.surface),
            WidgetEvent::TransitionEnd => {
                let changed = self.panel.transition_end(&mut self.surface);
                self.after_transition(changed);
            }
            WidgetEvent::ScriptLoaded { name } => {
                self.assets
                    .script_loaded(&name, &self.config, &mut self.surface);
            }
            WidgetEvent::Message { data, origin } => self.on_message(&data, &origin),
            WidgetEvent::Resize => self.relayout(),
            WidgetEvent::OrientationChange => {
                if let Some(task) = self.orientation_task.take() {
                    self.surface.cancel(task);
                }
                let task = self.surface.schedule(
                    self.options.orientation_delay_ms,
                    WidgetEvent::OrientationSettled,
                );
                self.orientation_task = Some(task);
            }
            WidgetEvent::OrientationSettled => {
                self.orientation_task = None;
                self.relayout();
            }
            WidgetEvent::PulseExpired => self.badge.pulse_expired(&mut self.surface),
            WidgetEvent::TriggerPoll => self.trigger.poll(&mut self.surface),
            WidgetEvent::Dispose => self.dispose(),
        }
    }

    /// Same as a launcher click
    pub fn toggle(&mut self) {
        self.handle(WidgetEvent::Toggle);
    }

    /// Release listeners and pending timers. The DOM is left as it is.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.listeners.clear();
        self.bus.detach();
        self.trigger.cancel(&mut self.surface);
        self.badge.cancel(&mut self.surface);
        if let Some(task) = self.orientation_task.take() {
            self.surface.cancel(task);
        }
        tracing::info!("Chat widget disposed");
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn unread_count(&self) -> u32 {
        self.badge.count()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn after_transition(&mut self, changed: Option<PanelState>) {
        let Some(state) = changed else {
            return;
        };

        self.launcher.set_open(&mut self.surface, self.panel.is_open());
        if state == PanelState::Open {
            self.badge.clear(&mut self.surface, self.options.pulse_ms);
        }
    }

    fn on_message(&mut self, data: &str, origin: &str) {
        let Some(message) = self.bus.receive(data, origin) else {
            return;
        };

        match message {
            InboundMessage::Iframe { close: true } => {
                let changed = self.panel.close(&mut self.surface);
                self.after_transition(changed);
            }
            InboundMessage::Iframe { close: false } => {}
            InboundMessage::UnreadCount { count } => {
                self.badge.set(
                    InboundMessage::clamp_count(count),
                    &mut self.surface,
                    self.options.pulse_ms,
                );
            }
            InboundMessage::NewMessage => {
                if !self.panel.is_open() {
                    self.badge
                        .increment(&mut self.surface, self.options.pulse_ms);
                }
            }
        }
    }

    fn relayout(&mut self) {
        let viewport = self.surface.viewport();
        self.launcher.relayout(
            &mut self.surface,
            viewport,
            self.options.mobile_breakpoint_px,
        );
        self.panel.relayout(&mut self.surface, viewport);
    }
}
