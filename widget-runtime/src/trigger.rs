//! Trigger Binding
//!
//! Attaches the open action either to the launcher or to a host-page element.
//! Host elements may render after the widget starts, so a missing element is
//! polled for until it shows up, the attempt limit runs out, or the poll is
//! cancelled.

use crate::config::Trigger;
use crate::surface::{ClickTarget, Surface, TaskId};
use crate::widget::WidgetEvent;

/// Polling behaviour for host-page triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerPolicy {
    pub interval_ms: u32,
    /// `None` polls for the life of the page
    pub max_attempts: Option<u32>,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            max_attempts: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStatus {
    Idle,
    Polling { attempts: u32, task: TaskId },
    Bound,
    GaveUp { attempts: u32 },
    Cancelled,
}

#[derive(Debug)]
pub struct TriggerBinder {
    trigger: Trigger,
    policy: TriggerPolicy,
    status: TriggerStatus,
}

impl TriggerBinder {
    pub fn new(trigger: Trigger, policy: TriggerPolicy) -> Self {
        Self {
            trigger,
            policy,
            status: TriggerStatus::Idle,
        }
    }

    pub fn status(&self) -> TriggerStatus {
        self.status
    }

    /// Bind the launcher right away, or start looking for the host element
    pub fn start<S: Surface>(&mut self, surface: &mut S) {
        if self.status != TriggerStatus::Idle {
            return;
        }
        match &self.trigger {
            Trigger::Default => {
                surface.bind_click(&ClickTarget::Launcher);
                self.status = TriggerStatus::Bound;
            }
            Trigger::Element(_) => self.attempt(surface, 0),
        }
    }

    /// Timer callback for the next lookup
    pub fn poll<S: Surface>(&mut self, surface: &mut S) {
        if let TriggerStatus::Polling { attempts, .. } = self.status {
            self.attempt(surface, attempts);
        }
    }

    /// Stop polling; a bound trigger stays bound
    pub fn cancel<S: Surface>(&mut self, surface: &mut S) {
        if let TriggerStatus::Polling { task, .. } = self.status {
            surface.cancel(task);
            self.status = TriggerStatus::Cancelled;
        }
    }

    fn attempt<S: Surface>(&mut self, surface: &mut S, previous: u32) {
        let Trigger::Element(id) = &self.trigger else {
            return;
        };
        let attempts = previous.saturating_add(1);

        if surface.element_exists(id) {
            surface.bind_click(&ClickTarget::Element(id.clone()));
            tracing::info!("Bound chat trigger to #{} after {} lookup(s)", id, attempts);
            self.status = TriggerStatus::Bound;
            return;
        }

        if let Some(limit) = self.policy.max_attempts {
            if attempts >= limit {
                tracing::warn!("Trigger element #{} not found after {} lookups", id, attempts);
                self.status = TriggerStatus::GaveUp { attempts };
                return;
            }
        }

        if attempts == 1 {
            tracing::debug!("Trigger element #{} not in the page yet, polling", id);
        }
        let task = surface.schedule(self.policy.interval_ms, WidgetEvent::TriggerPoll);
        self.status = TriggerStatus::Polling { attempts, task };
    }
}
