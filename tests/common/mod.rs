//! Integration test common infrastructure.
//!
//! A recording host fake shared by the integration suites: it captures
//! everything the engine sends outward and serves canned user, channel,
//! and service lookups.

// Each integration test crate compiles this module separately and none of
// them uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use slirc_script::{ChannelInfo, Host, UserInfo};

/// One message the engine pushed out through the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub source: String,
    pub target: String,
    pub text: String,
}

/// Recording host fake.
#[derive(Default)]
pub struct TestHost {
    sent: Mutex<Vec<SentMessage>>,
    users: Mutex<HashMap<String, UserInfo>>,
    channels: Mutex<HashMap<String, ChannelInfo>>,
    services: Mutex<HashMap<String, String>>,
}

impl TestHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, nick: &str, account: Option<&str>) {
        self.users.lock().insert(
            nick.to_string(),
            UserInfo {
                nick: nick.to_string(),
                account: account.map(String::from),
                ip: Some(IpAddr::from([127, 0, 0, 1])),
                channels: vec!["#lobby".to_string()],
            },
        );
    }

    pub fn add_channel(&self, name: &str, members: usize) {
        self.channels.lock().insert(
            name.to_string(),
            ChannelInfo {
                name: name.to_string(),
                topic: None,
                members,
                created_at: Utc::now(),
            },
        );
    }

    pub fn add_service(&self, role: &str, nick: &str) {
        self.services
            .lock()
            .insert(role.to_string(), nick.to_string());
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Texts of everything sent to `target`, in order.
    pub fn sent_to(&self, target: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.target == target)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Host for TestHost {
    async fn send_target_privmsg(&self, source: &str, target: &str, text: &str) {
        self.sent.lock().push(SentMessage {
            source: source.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        });
    }

    async fn get_user(&self, nick: &str) -> Option<UserInfo> {
        self.users.lock().get(nick).cloned()
    }

    async fn get_channel(&self, name: &str) -> Option<ChannelInfo> {
        self.channels.lock().get(name).cloned()
    }

    async fn get_service_info(&self) -> HashMap<String, String> {
        self.services.lock().clone()
    }
}
