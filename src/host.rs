//! The daemon-side boundary the engine calls back through.

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Snapshot of a connected user, as the daemon knows them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    /// Current nickname.
    pub nick: String,
    /// Services account, when the user is identified.
    pub account: Option<String>,
    /// Remote address, when the daemon exposes one.
    pub ip: Option<IpAddr>,
    /// Channels the user is currently on.
    pub channels: Vec<String>,
}

/// Snapshot of a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel name, with leading sigil.
    pub name: String,
    /// Current topic, if one is set.
    pub topic: Option<String>,
    /// Member count at the time of the lookup.
    pub members: usize,
    /// When the channel was created.
    pub created_at: DateTime<Utc>,
}

/// Network primitives the daemon provides to the engine.
///
/// The daemon implements this once and hands the engine an `Arc`; tests use
/// a recording fake. Lookups return `None` for anything the daemon does not
/// currently know about.
#[async_trait]
pub trait Host: Send + Sync {
    /// Deliver a PRIVMSG from `source` to `target` (a channel or a nick).
    ///
    /// Fire-and-forget: an undeliverable target is the daemon's problem, not
    /// the calling plugin's.
    async fn send_target_privmsg(&self, source: &str, target: &str, text: &str);

    /// Look up a connected user by nick.
    async fn get_user(&self, nick: &str) -> Option<UserInfo>;

    /// Look up a channel by name.
    async fn get_channel(&self, name: &str) -> Option<ChannelInfo>;

    /// Map from service role (e.g. `operserv`) to that service's current
    /// nick.
    async fn get_service_info(&self) -> HashMap<String, String>;
}
