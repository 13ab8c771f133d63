//! Per-delivery context handed to event handlers.

use std::sync::Arc;

use crate::event::EventOrigin;
use crate::host::Host;

/// Immutable bundle describing one event delivery.
///
/// Built once per delivery and shared by every handler invoked for it.
/// Carries who the event is about, the service identity it arrived through,
/// where replies belong, and the host handle plugins reach network
/// primitives on.
pub struct EventContext {
    /// Host daemon callback surface.
    pub host: Arc<dyn Host>,
    /// Service identity replies are sent from.
    pub service: String,
    /// Entity the event is about.
    pub actor: String,
    /// Shared venue for replies, when there is one.
    pub target: Option<String>,
}

impl EventContext {
    /// Builds the context for one delivery.
    pub fn new(host: Arc<dyn Host>, origin: EventOrigin) -> Self {
        Self {
            host,
            service: origin.service,
            actor: origin.actor,
            // EventOrigin::new already normalizes; guard the literal path too
            target: origin.target.filter(|t| !t.is_empty()),
        }
    }

    /// Where a reply to this event belongs: the shared venue when there is
    /// one, otherwise the actor directly.
    pub fn reply_target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.actor)
    }

    /// Sends `text` back to whoever triggered the event.
    ///
    /// In a channel the actor is addressed by nick (`alice: text`) so the
    /// response reads correctly in public; in a direct exchange the text goes
    /// back verbatim.
    pub async fn reply(&self, text: &str) {
        match &self.target {
            Some(target) => {
                let line = format!("{}: {}", self.actor, text);
                self.host
                    .send_target_privmsg(&self.service, target, &line)
                    .await;
            }
            None => {
                self.host
                    .send_target_privmsg(&self.service, &self.actor, text)
                    .await;
            }
        }
    }
}
