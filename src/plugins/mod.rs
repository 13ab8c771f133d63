//! Plugin model and lifecycle.
//!
//! Plugins are constructed from a closed table mapping identifiers to
//! constructor functions: the built-ins are pre-registered, hosts may add
//! their own before loading. A load stages the plugin's hooks, runs its
//! startup, and only then commits everything to the registry in one batch,
//! so a failed load leaves no trace behind.

pub mod annoy;
pub mod hangman;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::config::ScriptConfig;
use crate::context::EventContext;
use crate::error::LoadError;
use crate::event::EventOrigin;
use crate::hooks::{HookBinder, HookRegistry};
use crate::host::Host;

/// A loadable scripting extension.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Identifier the plugin's hooks and commands are registered under.
    fn name(&self) -> &'static str;

    /// Startup: stage hooks on `binder`, announce through `ctx` if desired.
    ///
    /// `ctx` is bound to the engine's own service identity with no actor or
    /// target. An error aborts the load and nothing staged reaches the
    /// registry.
    async fn on_load(
        self: Arc<Self>,
        binder: &mut HookBinder,
        ctx: &EventContext,
    ) -> Result<(), LoadError>;
}

/// Builds a plugin instance from configuration.
pub type PluginCtor = fn(&ScriptConfig) -> Result<Arc<dyn Plugin>, LoadError>;

/// Instantiates plugins and owns the loaded-instance table.
pub struct PluginLoader {
    config: ScriptConfig,
    registry: Arc<HookRegistry>,
    host: Arc<dyn Host>,
    ctors: HashMap<String, PluginCtor>,
    loaded: DashMap<String, Arc<dyn Plugin>>,
}

impl PluginLoader {
    /// Loader with the built-in plugin set registered and nothing loaded.
    pub fn new(config: ScriptConfig, registry: Arc<HookRegistry>, host: Arc<dyn Host>) -> Self {
        let mut ctors: HashMap<String, PluginCtor> = HashMap::new();
        ctors.insert("annoy".to_string(), annoy::Annoy::construct as PluginCtor);
        ctors.insert(
            "hangman".to_string(),
            hangman::Hangman::construct as PluginCtor,
        );

        Self {
            config,
            registry,
            host,
            ctors,
            loaded: DashMap::new(),
        }
    }

    /// Registers a constructor under `name`, replacing any previous one.
    /// Already-loaded instances keep running until their next load.
    pub fn register(&mut self, name: impl Into<String>, ctor: PluginCtor) {
        self.ctors.insert(name.into(), ctor);
    }

    /// Loads `name`: construct the instance, let it stage hooks, commit the
    /// batch, record the instance.
    pub async fn load(&self, name: &str) -> Result<(), LoadError> {
        if self.loaded.contains_key(name) {
            return Err(LoadError::AlreadyLoaded(name.to_string()));
        }
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| LoadError::UnknownPlugin(name.to_string()))?;
        let plugin = ctor(&self.config)?;

        let mut binder = HookBinder::new(name);
        let ctx = EventContext::new(
            Arc::clone(&self.host),
            EventOrigin::direct("", &self.config.engine.service),
        );
        Arc::clone(&plugin).on_load(&mut binder, &ctx).await?;

        let staged = binder.staged_len();
        self.registry.extend(binder.into_hooks());
        self.loaded.insert(name.to_string(), plugin);
        info!(plugin = %name, hooks = staged, "plugin loaded");
        Ok(())
    }

    /// Unloads `name`, purging every hook it owns. Returns the purge count.
    pub fn unload(&self, name: &str) -> Result<usize, LoadError> {
        match self.loaded.remove(name) {
            Some(_) => {
                let purged = self.registry.purge_owner(name);
                info!(plugin = %name, hooks = purged, "plugin unloaded");
                Ok(purged)
            }
            None => Err(LoadError::NotLoaded(name.to_string())),
        }
    }

    /// Reloads `name`: unload, then a fresh load.
    ///
    /// When the load phase fails the plugin stays unloaded with no stale
    /// hooks; retrying `load` once the cause is fixed is the caller's move.
    pub async fn reload(&self, name: &str) -> Result<(), LoadError> {
        self.unload(name)?;
        self.load(name).await
    }

    /// Loads every plugin on the configured autoload list, in order,
    /// logging and continuing past individual failures.
    pub async fn autoload(&self) {
        for name in self.config.engine.autoload.clone() {
            if let Err(e) = self.load(&name).await {
                warn!(plugin = %name, error = %e, "autoload failed");
            }
        }
    }

    /// Whether `name` is currently loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Identifiers of the loaded plugins, sorted.
    pub fn loaded_plugins(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Configuration plugins are constructed from.
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }
}
