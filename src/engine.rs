//! The embeddable engine facade.

use std::sync::Arc;

use crate::config::ScriptConfig;
use crate::dispatch::Dispatcher;
use crate::error::{HandlerError, LoadError};
use crate::event::{EventKind, EventOrigin};
use crate::hooks::HookRegistry;
use crate::host::Host;
use crate::plugins::{PluginCtor, PluginLoader};

/// The scripting engine a services daemon embeds.
///
/// Owns the hook registry, the dispatcher, and the plugin loader, and
/// exposes one typed entry point per network event the daemon reports.
/// The daemon awaits each entry point to completion before reporting the
/// next event, and serializes lifecycle calls against delivery; the engine
/// is safe if that contract slips, but ordering guarantees are not.
pub struct ScriptEngine {
    dispatcher: Dispatcher,
    loader: PluginLoader,
}

impl ScriptEngine {
    /// Engine with the built-in plugins registered but nothing loaded.
    /// Call [`autoload`](Self::autoload) or [`load`](Self::load) to bring
    /// plugins up.
    pub fn new(config: ScriptConfig, host: Arc<dyn Host>) -> Self {
        let registry = Arc::new(HookRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::clone(&host));
        let loader = PluginLoader::new(config, registry, host);
        Self { dispatcher, loader }
    }

    /// Registers an extra plugin constructor before loading.
    pub fn register_plugin(&mut self, name: impl Into<String>, ctor: PluginCtor) {
        self.loader.register(name, ctor);
    }

    /// Loads every plugin on the autoload list, continuing past failures.
    pub async fn autoload(&self) {
        self.loader.autoload().await;
    }

    /// Loads one plugin.
    pub async fn load(&self, name: &str) -> Result<(), LoadError> {
        self.loader.load(name).await
    }

    /// Unloads one plugin; returns how many hooks were purged.
    pub fn unload(&self, name: &str) -> Result<usize, LoadError> {
        self.loader.unload(name)
    }

    /// Reloads one plugin: unload, then a fresh load.
    pub async fn reload(&self, name: &str) -> Result<(), LoadError> {
        self.loader.reload(name).await
    }

    /// A user joined a channel.
    pub async fn join(
        &self,
        origin: EventOrigin,
        channel: &str,
        nick: &str,
    ) -> Result<bool, HandlerError> {
        let data = vec![channel.to_string(), nick.to_string()];
        self.dispatcher
            .deliver(EventKind::Join, origin, &data, &data)
            .await
    }

    /// A server linked to the network.
    pub async fn server_link(
        &self,
        origin: EventOrigin,
        name: &str,
        description: &str,
    ) -> Result<bool, HandlerError> {
        let data = vec![name.to_string(), description.to_string()];
        self.dispatcher
            .deliver(EventKind::ServerLink, origin, &data, &data)
            .await
    }

    /// A user completed registration.
    ///
    /// Hooks filter on all four fields; handlers receive only the nick.
    pub async fn new_user(
        &self,
        origin: EventOrigin,
        nick: &str,
        ident: &str,
        hostname: &str,
        realname: &str,
    ) -> Result<bool, HandlerError> {
        let data = vec![
            nick.to_string(),
            ident.to_string(),
            hostname.to_string(),
            realname.to_string(),
        ];
        let args = vec![nick.to_string()];
        self.dispatcher
            .deliver(EventKind::NewUser, origin, &data, &args)
            .await
    }

    /// A user changed nick.
    pub async fn nick_change(
        &self,
        origin: EventOrigin,
        nick: &str,
        old_nick: &str,
    ) -> Result<bool, HandlerError> {
        let data = vec![nick.to_string(), old_nick.to_string()];
        self.dispatcher
            .deliver(EventKind::NickChange, origin, &data, &data)
            .await
    }

    /// A chat command addressed to `plugin`.
    pub async fn command(
        &self,
        origin: EventOrigin,
        plugin: &str,
        command: &str,
        raw_args: &str,
    ) -> Result<bool, HandlerError> {
        let data = vec![plugin.to_string(), command.to_string()];
        let args = vec![raw_args.to_string()];
        self.dispatcher
            .deliver(EventKind::Command, origin, &data, &args)
            .await
    }

    /// Raw delivery, for events the host composes itself.
    pub async fn deliver(
        &self,
        event: EventKind,
        origin: EventOrigin,
        filter_data: &[String],
        call_args: &[String],
    ) -> Result<bool, HandlerError> {
        self.dispatcher
            .deliver(event, origin, filter_data, call_args)
            .await
    }

    /// Hook registry shared with the dispatcher.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        self.dispatcher.registry()
    }

    /// Delivery totals per event kind, busiest first.
    pub fn delivery_stats(&self) -> Vec<(EventKind, u64)> {
        self.dispatcher.delivery_stats()
    }

    /// Whether `name` is currently loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loader.is_loaded(name)
    }

    /// Currently loaded plugin identifiers, sorted.
    pub fn loaded_plugins(&self) -> Vec<String> {
        self.loader.loaded_plugins()
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &ScriptConfig {
        self.loader.config()
    }
}
