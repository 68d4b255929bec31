//! Unread Badge
//!
//! Counter shown on the launcher while the panel is closed.

use crate::surface::{Node, Surface, TaskId};
use crate::widget::WidgetEvent;

/// Counts above this render as "99+"
pub const BADGE_MAX: u32 = 99;

/// Badge text for a count
pub fn badge_text(count: u32) -> String {
    if count > BADGE_MAX {
        format!("{}+", BADGE_MAX)
    } else {
        count.to_string()
    }
}

#[derive(Debug, Default)]
pub struct UnreadBadge {
    count: u32,
    pulse: Option<TaskId>,
}

impl UnreadBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Render the initial (empty) badge
    pub fn render<S: Surface>(&self, surface: &mut S) {
        surface.set_text(Node::Badge, &badge_text(self.count));
    }

    /// Show `count`. Only a 0 → 1 change pulses.
    pub fn set<S: Surface>(&mut self, count: u32, surface: &mut S, pulse_ms: u32) {
        let previous = self.count;
        self.count = count;

        surface.set_text(Node::Badge, &badge_text(count));
        if count > 0 {
            surface.add_class(Node::Badge, "show");
        } else {
            surface.remove_class(Node::Badge, "show");
        }

        if previous == 0 && count == 1 {
            if let Some(task) = self.pulse.take() {
                surface.cancel(task);
            }
            surface.add_class(Node::Badge, "pulse");
            self.pulse = Some(surface.schedule(pulse_ms, WidgetEvent::PulseExpired));
        }
    }

    pub fn increment<S: Surface>(&mut self, surface: &mut S, pulse_ms: u32) {
        self.set(self.count.saturating_add(1), surface, pulse_ms);
    }

    pub fn clear<S: Surface>(&mut self, surface: &mut S, pulse_ms: u32) {
        self.set(0, surface, pulse_ms);
    }

    /// Timer callback ending the pulse animation
    pub fn pulse_expired<S: Surface>(&mut self, surface: &mut S) {
        if self.pulse.take().is_some() {
            surface.remove_class(Node::Badge, "pulse");
        }
    }

    /// Drop a pending pulse timer
    pub fn cancel<S: Surface>(&mut self, surface: &mut S) {
        if let Some(task) = self.pulse.take() {
            surface.cancel(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;

    const PULSE_MS: u32 = 600;

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), "0");
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "99+");
        assert_eq!(badge_text(150), "99+");
    }

    #[test]
    fn test_show_class_follows_count() {
        let mut surface = RecordingSurface::new();
        let mut badge = UnreadBadge::new();

        badge.set(3, &mut surface, PULSE_MS);
        assert!(surface.has_class(Node::Badge, "show"));
        assert_eq!(surface.text(Node::Badge), Some("3"));

        badge.clear(&mut surface, PULSE_MS);
        assert!(!surface.has_class(Node::Badge, "show"));
        assert_eq!(badge.count(), 0);
    }

    #[test]
    fn test_zero_to_one_pulses_for_600ms() {
        let mut surface = RecordingSurface::new();
        let mut badge = UnreadBadge::new();

        badge.set(1, &mut surface, PULSE_MS);
        assert!(surface.has_class(Node::Badge, "pulse"));

        let due = surface.advance(599);
        assert!(due.is_empty());
        let due = surface.advance(1);
        assert_eq!(due, vec![WidgetEvent::PulseExpired]);

        badge.pulse_expired(&mut surface);
        assert!(!surface.has_class(Node::Badge, "pulse"));
    }

    #[test]
    fn test_one_to_two_does_not_pulse() {
        let mut surface = RecordingSurface::new();
        let mut badge = UnreadBadge::new();
        badge.set(1, &mut surface, PULSE_MS);
        surface.advance(PULSE_MS);
        badge.pulse_expired(&mut surface);

        badge.increment(&mut surface, PULSE_MS);
        assert_eq!(badge.count(), 2);
        assert!(!surface.has_class(Node::Badge, "pulse"));
        assert!(surface.pending_timers().is_empty());
    }

    #[test]
    fn test_zero_to_five_does_not_pulse() {
        let mut surface = RecordingSurface::new();
        let mut badge = UnreadBadge::new();
        badge.set(5, &mut surface, PULSE_MS);
        assert!(!surface.has_class(Node::Badge, "pulse"));
    }

    #[test]
    fn test_repeat_pulse_restarts_timer() {
        let mut surface = RecordingSurface::new();
        let mut badge = UnreadBadge::new();
        badge.set(1, &mut surface, PULSE_MS);
        surface.advance(300);
        badge.set(0, &mut surface, PULSE_MS);
        badge.set(1, &mut surface, PULSE_MS);

        assert_eq!(surface.pending_timers().len(), 1);
        assert!(surface.advance(300).is_empty());
        assert_eq!(surface.advance(300), vec![WidgetEvent::PulseExpired]);
    }
}
