//! # slirc-script
//!
//! Plugin scripting and event hook engine for Straylight IRC services.
//!
//! A services daemon embeds a [`ScriptEngine`] and reports network events
//! into it; independently loadable plugins react to those events and
//! register chat commands, without the daemon knowing anything about them
//! beyond this crate's traits.
//!
//! ## Features
//!
//! - Positional event filters with wildcard slots, validated against a
//!   static per-event arity table at registration time
//! - Ordered dispatch with first-claim short-circuit: registration order is
//!   dispatch order, and the first handler to claim an event stops the walk
//! - Immutable per-delivery [`EventContext`] with channel-aware reply
//!   routing
//! - Plugin lifecycle with staged hook commit: a failed load leaves no
//!   partial registrations, and reload is a clean unload-then-load
//! - Two built-in plugins (`hangman`, `annoy`) exercising sessions,
//!   commands, and event hooks

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use slirc_script::{ChannelInfo, EventOrigin, Host, ScriptConfig, ScriptEngine, UserInfo};
//!
//! struct NullHost;
//!
//! #[async_trait]
//! impl Host for NullHost {
//!     async fn send_target_privmsg(&self, _source: &str, _target: &str, _text: &str) {}
//!     async fn get_user(&self, _nick: &str) -> Option<UserInfo> {
//!         None
//!     }
//!     async fn get_channel(&self, _name: &str) -> Option<ChannelInfo> {
//!         None
//!     }
//!     async fn get_service_info(&self) -> HashMap<String, String> {
//!         HashMap::new()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rt = tokio::runtime::Builder::new_current_thread().build()?;
//! rt.block_on(async {
//!     let engine = ScriptEngine::new(ScriptConfig::default(), Arc::new(NullHost));
//!     engine.load("annoy").await?;
//!
//!     let origin = EventOrigin::channel("alice", "ScriptServ", "#lobby");
//!     let handled = engine.command(origin, "annoy", "dance", "").await?;
//!     assert!(handled);
//!     Ok::<_, Box<dyn std::error::Error>>(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Filters
//!
//! ```rust
//! use slirc_script::{EventFilter, EventKind};
//!
//! let any_join = EventFilter::any(EventKind::Join.filter_arity());
//! assert!(any_join.matches(&["#lobby", "alice"]));
//!
//! let exact = EventFilter::exact(["hangman", "guess"]);
//! assert!(exact.matches(&["hangman", "guess"]));
//! assert!(!exact.matches(&["hangman", "start"]));
//! ```
//!
//! ## Acknowledgments
//!
//! The hook and command model follows the plugin scripting layer of the
//! [X3](https://github.com/evilnet/x3) IRC services, reworked around an
//! explicit plugin interface and typed per-delivery contexts.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod hooks;
pub mod host;
pub mod plugins;

pub use self::config::{AnnoyConfig, ConfigError, EngineConfig, HangmanConfig, ScriptConfig};
pub use self::context::EventContext;
pub use self::dispatch::Dispatcher;
pub use self::engine::ScriptEngine;
pub use self::error::{HandlerError, LoadError, RegistrationError};
pub use self::event::{EventKind, EventOrigin};
pub use self::hooks::{
    EventFilter, EventHandler, Hook, HookAction, HookBinder, HookRegistry, HookResult,
};
pub use self::host::{ChannelInfo, Host, UserInfo};
pub use self::plugins::{Plugin, PluginCtor, PluginLoader};
