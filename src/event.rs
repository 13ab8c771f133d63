//! Event taxonomy for the scripting engine.
//!
//! Every deliverable network event has a fixed filter arity: the number of
//! string slots a hook's filter must declare for that event. Arity is checked
//! once at registration, so dispatch can compare filters slot-wise without
//! re-validating shape.

use std::fmt;

/// Network events a plugin can hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A user joined a channel. Filter slots: `[channel, nick]`.
    Join,
    /// A server linked to the network. Filter slots: `[name, description]`.
    ServerLink,
    /// A user completed registration. Filter slots:
    /// `[nick, ident, hostname, realname]`.
    NewUser,
    /// A user changed nick. Filter slots: `[new_nick, old_nick]`.
    NickChange,
    /// A chat command addressed to a plugin. Filter slots:
    /// `[plugin, command]`.
    Command,
}

impl EventKind {
    /// Every event kind, in delivery-table order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Join,
        EventKind::ServerLink,
        EventKind::NewUser,
        EventKind::NickChange,
        EventKind::Command,
    ];

    /// Number of filter slots a hook for this event must declare.
    pub const fn filter_arity(self) -> usize {
        match self {
            EventKind::Join => 2,
            EventKind::ServerLink => 2,
            EventKind::NewUser => 4,
            EventKind::NickChange => 2,
            EventKind::Command => 2,
        }
    }

    /// Stable lowercase name, used in logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Join => "join",
            EventKind::ServerLink => "server_link",
            EventKind::NewUser => "new_user",
            EventKind::NickChange => "nick_change",
            EventKind::Command => "command",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an event is attributed to and where replies belong.
///
/// `target` is the channel (or query partner) the event happened in; `None`
/// means there is no shared venue and replies go straight back to the actor.
/// Empty strings normalize to `None` at construction so the reply router only
/// ever sees one representation of "no target".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventOrigin {
    /// Entity the event is about: a nick, or a server name for link events.
    pub actor: String,
    /// Service identity the event arrived through.
    pub service: String,
    /// Venue replies should be sent to, when there is one.
    pub target: Option<String>,
}

impl EventOrigin {
    /// Builds an origin, normalizing an empty target to `None`.
    pub fn new(
        actor: impl Into<String>,
        service: impl Into<String>,
        target: Option<String>,
    ) -> Self {
        EventOrigin {
            actor: actor.into(),
            service: service.into(),
            target: target.filter(|t| !t.is_empty()),
        }
    }

    /// Origin for an event that happened in a channel.
    pub fn channel(
        actor: impl Into<String>,
        service: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        EventOrigin::new(actor, service, Some(channel.into()))
    }

    /// Origin for a direct (no shared venue) event.
    pub fn direct(actor: impl Into<String>, service: impl Into<String>) -> Self {
        EventOrigin::new(actor, service, None)
    }
}
