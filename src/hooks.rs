//! Hook model and registry.
//!
//! A hook binds an event kind, a per-slot filter, and a handler under a
//! plugin owner. The registry keeps one insertion-ordered list per event
//! kind; registration order is dispatch order. Filter shape is validated
//! once, at construction, against the event's declared arity, so matching
//! never has to re-check it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::context::EventContext;
use crate::error::{HandlerError, RegistrationError};
use crate::event::EventKind;

/// Per-slot match pattern over an event's filter data.
///
/// `None` slots match anything; `Some` slots match by exact, case-sensitive
/// equality. The slot count must equal the event's filter arity, which
/// [`Hook::new`] enforces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventFilter(Vec<Option<String>>);

impl EventFilter {
    /// Filter that matches only the given values, slot for slot.
    pub fn exact<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventFilter(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Filter of `arity` wildcard slots: matches every event of its kind.
    pub fn any(arity: usize) -> Self {
        EventFilter(vec![None; arity])
    }

    /// Filter from explicit slots, `None` meaning wildcard.
    pub fn from_slots(slots: Vec<Option<String>>) -> Self {
        EventFilter(slots)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-slot filter.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slot-wise match against an event's filter data.
    ///
    /// Data whose length differs from the slot count never matches;
    /// registration pins the length, so that only arises on a malformed
    /// delivery.
    pub fn matches<S: AsRef<str>>(&self, data: &[S]) -> bool {
        self.0.len() == data.len()
            && self
                .0
                .iter()
                .zip(data)
                .all(|(slot, value)| match slot {
                    Some(want) => want == value.as_ref(),
                    None => true,
                })
    }
}

/// What a handler did with a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookAction {
    /// Pass the event on to the remaining matching hooks.
    Continue,
    /// Claim the event; dispatch stops here.
    Handled,
}

/// Result type for event handlers: a claim decision, or a fault that aborts
/// the delivery.
pub type HookResult = Result<HookAction, HandlerError>;

/// Plugin-side event callback.
///
/// Handlers receive the delivery context and the event's call arguments.
/// Call arguments are not the filter data: `new_user` filters on four
/// fields but hands handlers only the nick, and command hooks receive the
/// raw argument string rather than the `[plugin, command]` pair they
/// matched on.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles one delivery.
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult;
}

/// One registered hook.
///
/// Constructed only through [`Hook::new`], which validates the filter shape;
/// never mutated afterwards. Removal happens solely by owner purge.
pub struct Hook {
    /// Event this hook fires on.
    pub event: EventKind,
    /// Slot-wise filter over the event's data.
    pub filter: EventFilter,
    /// Plugin the hook belongs to; purged with it on unload.
    pub owner: String,
    /// Opaque tag the owner attached at registration.
    pub data: Option<String>,
    handler: Arc<dyn EventHandler>,
}

impl Hook {
    /// Validates `filter` against the event's arity and builds the hook.
    pub fn new(
        event: EventKind,
        filter: EventFilter,
        handler: Arc<dyn EventHandler>,
        owner: impl Into<String>,
        data: Option<String>,
    ) -> Result<Self, RegistrationError> {
        let expected = event.filter_arity();
        if filter.len() != expected {
            return Err(RegistrationError::FilterArity {
                event,
                expected,
                got: filter.len(),
            });
        }
        Ok(Hook {
            event,
            filter,
            owner: owner.into(),
            data,
            handler,
        })
    }

    /// Handler invoked when this hook matches.
    pub fn handler(&self) -> &Arc<dyn EventHandler> {
        &self.handler
    }
}

// The handler is a trait object with no useful rendering; show the
// registration fields and elide it.
impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("event", &self.event)
            .field("filter", &self.filter)
            .field("owner", &self.owner)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered hook lists, one per event kind.
///
/// The lock is never held across an await: dispatch snapshots the matching
/// hooks under a read lock and releases it before invoking anything, so a
/// handler that registers or purges hooks cannot deadlock the registry.
pub struct HookRegistry {
    hooks: RwLock<HashMap<EventKind, Vec<Arc<Hook>>>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a hook to its event's list.
    pub fn add(&self, hook: Hook) {
        self.hooks
            .write()
            .entry(hook.event)
            .or_default()
            .push(Arc::new(hook));
    }

    /// Appends a batch of hooks under one write lock.
    ///
    /// The loader commits a plugin's staged hooks through this, so no
    /// delivery can observe a half-registered plugin.
    pub fn extend(&self, hooks: Vec<Hook>) {
        let mut map = self.hooks.write();
        for hook in hooks {
            map.entry(hook.event).or_default().push(Arc::new(hook));
        }
    }

    /// Ordered hooks for `event` whose filters match `data`.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn find_matches(&self, event: EventKind, data: &[String]) -> Vec<Arc<Hook>> {
        let map = self.hooks.read();
        match map.get(&event) {
            Some(list) => list
                .iter()
                .filter(|hook| hook.filter.matches(data))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Removes every hook `owner` registered, returning how many went away.
    pub fn purge_owner(&self, owner: &str) -> usize {
        let mut map = self.hooks.write();
        let mut removed = 0;
        for list in map.values_mut() {
            let before = list.len();
            list.retain(|hook| hook.owner != owner);
            removed += before - list.len();
        }
        removed
    }

    /// Number of hooks `owner` currently has registered.
    pub fn count_owned(&self, owner: &str) -> usize {
        self.hooks
            .read()
            .values()
            .flat_map(|list| list.iter())
            .filter(|hook| hook.owner == owner)
            .count()
    }

    /// Total hooks registered across all events.
    pub fn len(&self) -> usize {
        self.hooks.read().values().map(Vec::len).sum()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Staging collector a plugin registers hooks through while loading.
///
/// Nothing here touches the registry. The loader commits the staged hooks
/// in one batch after the plugin's startup succeeds; any error discards the
/// stage, leaving no partial registrations behind.
pub struct HookBinder {
    owner: String,
    staged: Vec<Hook>,
}

impl HookBinder {
    /// Empty stage owned by `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            staged: Vec::new(),
        }
    }

    /// Stages an event hook.
    pub fn hook(
        &mut self,
        event: EventKind,
        filter: EventFilter,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistrationError> {
        self.hook_with_data(event, filter, handler, None)
    }

    /// Stages an event hook carrying an owner tag.
    pub fn hook_with_data(
        &mut self,
        event: EventKind,
        filter: EventFilter,
        handler: Arc<dyn EventHandler>,
        data: Option<String>,
    ) -> Result<(), RegistrationError> {
        let hook = Hook::new(event, filter, handler, self.owner.clone(), data)?;
        self.staged.push(hook);
        Ok(())
    }

    /// Stages a command registration: `[owner, command]` on the command
    /// event.
    ///
    /// The plugin slot always comes from the stage's owner, so a plugin
    /// cannot register commands under another plugin's name.
    pub fn command(
        &mut self,
        command: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistrationError> {
        let filter = EventFilter::exact([self.owner.clone(), command.into()]);
        self.hook(EventKind::Command, filter, handler)
    }

    /// Plugin identifier this stage belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of hooks staged so far.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn into_hooks(self) -> Vec<Hook> {
        self.staged
    }
}
