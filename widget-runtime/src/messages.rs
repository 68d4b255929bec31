//! Cross-Frame Messages
//!
//! Protocol spoken by the chat application inside the panel iframe. Messages
//! are dispatched on their `type` field; everything else posted to the host
//! window is ignored.
//!
//! The sender origin is NOT checked: any script on the page or in any frame can
//! close the panel or change the unread count.

use serde::Deserialize;

use crate::surface::{PageEvent, Subscription, Surface};

/// Messages from the chat iframe to the widget
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// `{type: "iframe", close: true}` asks the widget to close the panel
    Iframe {
        #[serde(default)]
        close: bool,
    },
    /// Authoritative unread count
    UnreadCount { count: f64 },
    /// A message arrived in the chat
    NewMessage,
}

impl InboundMessage {
    /// Parse a posted payload in its JSON form
    pub fn parse(data: &str) -> Option<Self> {
        match serde_json::from_str(data) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!("Ignoring window message: {}", e);
                None
            }
        }
    }

    /// Unread count clamped to a badge value
    pub fn clamp_count(count: f64) -> u32 {
        if count.is_nan() || count <= 0.0 {
            0
        } else if count >= u32::MAX as f64 {
            u32::MAX
        } else {
            count as u32
        }
    }
}

/// The single window `message` listener
#[derive(Debug, Default)]
pub struct MessageBus {
    subscription: Option<Subscription>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listener; a second call keeps the first registration
    pub fn attach<S: Surface>(&mut self, surface: &mut S) {
        if self.subscription.is_none() {
            self.subscription = Some(surface.subscribe(PageEvent::Message));
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Decode a delivered message
    pub fn receive(&self, data: &str, origin: &str) -> Option<InboundMessage> {
        if !self.is_attached() {
            return None;
        }
        tracing::trace!(origin = %origin, "Window message received");
        InboundMessage::parse(data)
    }

    /// Remove the listener
    pub fn detach(&mut self) {
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;

    #[test]
    fn test_parse_protocol_messages() {
        assert_eq!(
            InboundMessage::parse(r#"{"type":"iframe","close":true}"#),
            Some(InboundMessage::Iframe { close: true })
        );
        assert_eq!(
            InboundMessage::parse(r#"{"type":"iframe"}"#),
            Some(InboundMessage::Iframe { close: false })
        );
        assert_eq!(
            InboundMessage::parse(r#"{"type":"unread_count","count":150}"#),
            Some(InboundMessage::UnreadCount { count: 150.0 })
        );
        assert_eq!(
            InboundMessage::parse(r#"{"type":"new_message","text":"hi"}"#),
            Some(InboundMessage::NewMessage)
        );
    }

    #[test]
    fn test_parse_ignores_foreign_payloads() {
        assert_eq!(InboundMessage::parse(r#"{"type":"resize","height":400}"#), None);
        assert_eq!(InboundMessage::parse(r#"{"source":"react-devtools"}"#), None);
        assert_eq!(InboundMessage::parse(r#""hello""#), None);
        assert_eq!(InboundMessage::parse("not json"), None);
        assert_eq!(InboundMessage::parse(r#"{"type":"unread_count"}"#), None);
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(InboundMessage::clamp_count(-3.0), 0);
        assert_eq!(InboundMessage::clamp_count(7.9), 7);
        assert_eq!(InboundMessage::clamp_count(1e12), u32::MAX);
    }

    #[test]
    fn test_bus_attaches_once_and_releases() {
        let mut surface = RecordingSurface::new();
        let mut bus = MessageBus::new();
        assert_eq!(bus.receive(r#"{"type":"new_message"}"#, "https://x"), None);

        bus.attach(&mut surface);
        bus.attach(&mut surface);
        assert_eq!(surface.active_subscriptions(), 1);
        assert_eq!(
            bus.receive(r#"{"type":"new_message"}"#, "https://x"),
            Some(InboundMessage::NewMessage)
        );

        bus.detach();
        assert_eq!(surface.active_subscriptions(), 0);
    }
}
