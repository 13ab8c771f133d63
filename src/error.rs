//! Unified error handling for slirc-script.
//!
//! Central error hierarchy for the scripting engine: registration-time
//! failures, plugin lifecycle failures, and handler faults surfaced to the
//! host mid-delivery. Plugin-domain errors (bad guesses, missing games) stay
//! inside the plugin that owns them and become chat replies, never values of
//! these types.

use thiserror::Error;

use crate::event::EventKind;

// ============================================================================
// Registration Errors (hook attachment)
// ============================================================================

/// Errors raised while attaching a hook to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Filter slot count does not match the event's declared arity.
    #[error("{event} hooks take {expected} filter slot(s), got {got}")]
    FilterArity {
        /// Event the hook was registered for.
        event: EventKind,
        /// Slot count the event requires.
        expected: usize,
        /// Slot count the filter supplied.
        got: usize,
    },
}

// ============================================================================
// Load Errors (plugin lifecycle)
// ============================================================================

/// Errors raised by plugin lifecycle operations.
///
/// A failed load leaves the registry exactly as it was: staged hooks are
/// committed only after the whole load succeeds.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No constructor is registered under this identifier.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),

    /// The plugin is already in the instance table.
    #[error("plugin already loaded: {0}")]
    AlreadyLoaded(String),

    /// The plugin is not in the instance table.
    #[error("plugin not loaded: {0}")]
    NotLoaded(String),

    /// A hook the plugin tried to register was malformed.
    #[error("hook registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// Plugin construction or startup failed.
    #[error("plugin {plugin} failed to initialize: {reason}")]
    Init {
        /// Identifier of the failing plugin.
        plugin: String,
        /// What went wrong, in the plugin's own words.
        reason: String,
    },
}

// ============================================================================
// Handler Errors (event delivery)
// ============================================================================

/// Faults surfaced out of a handler during delivery.
///
/// One of these aborts the current delivery only: hooks later in the match
/// list are not invoked, while the registry and subsequent deliveries are
/// unaffected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandlerError {
    /// The handler hit a state it cannot recover from.
    #[error("internal error: {0}")]
    Internal(String),
}
