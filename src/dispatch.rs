//! Event delivery with short-circuit and usage counters.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{Instrument, Level, debug, span, warn};

use crate::context::EventContext;
use crate::error::HandlerError;
use crate::event::{EventKind, EventOrigin};
use crate::hooks::{HookAction, HookRegistry};
use crate::host::Host;

/// Delivers events into the hook registry.
///
/// One delivery: snapshot the matching hooks, build the context, invoke in
/// registration order. The first handler to claim the event ends the walk.
pub struct Dispatcher {
    registry: Arc<HookRegistry>,
    host: Arc<dyn Host>,
    /// Delivery counters for stats output.
    delivery_counts: HashMap<EventKind, Arc<AtomicU64>>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry` that calls back into `host`.
    pub fn new(registry: Arc<HookRegistry>, host: Arc<dyn Host>) -> Self {
        let mut delivery_counts = HashMap::new();
        for kind in EventKind::ALL {
            delivery_counts.insert(kind, Arc::new(AtomicU64::new(0)));
        }
        Self {
            registry,
            host,
            delivery_counts,
        }
    }

    /// Delivery totals per event kind, busiest first, unused kinds omitted.
    pub fn delivery_stats(&self) -> Vec<(EventKind, u64)> {
        let mut stats: Vec<_> = self
            .delivery_counts
            .iter()
            .map(|(kind, count)| (*kind, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        // Sort by delivery count (descending)
        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }

    /// Delivers one event.
    ///
    /// `filter_data` is what hook filters match against; `call_args` is what
    /// matching handlers receive. Returns whether any handler claimed the
    /// event. A handler error aborts this delivery only: hooks later in the
    /// match list stay uninvoked, the registry is untouched, and the next
    /// delivery proceeds normally.
    pub async fn deliver(
        &self,
        event: EventKind,
        origin: EventOrigin,
        filter_data: &[String],
        call_args: &[String],
    ) -> Result<bool, HandlerError> {
        // Counters for every kind are created in new(); a miss is a logic
        // error there.
        let counter = self
            .delivery_counts
            .get(&event)
            .expect("delivery counter missing for event kind");
        counter.fetch_add(1, Ordering::Relaxed);

        let matches = self.registry.find_matches(event, filter_data);
        if matches.is_empty() {
            return Ok(false);
        }

        let ctx = EventContext::new(Arc::clone(&self.host), origin);

        for hook in matches {
            let hook_span = span!(
                Level::DEBUG,
                "script.hook",
                event = %event,
                owner = %hook.owner,
                data = hook.data.as_deref(),
            );

            let result = hook
                .handler()
                .handle(&ctx, call_args)
                .instrument(hook_span)
                .await;

            match result {
                Ok(HookAction::Handled) => {
                    debug!(event = %event, owner = %hook.owner, "event claimed");
                    return Ok(true);
                }
                Ok(HookAction::Continue) => {}
                Err(e) => {
                    warn!(event = %event, owner = %hook.owner, error = %e, "handler failed");
                    return Err(e);
                }
            }
        }

        Ok(false)
    }

    /// Registry this dispatcher reads from.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Host handle deliveries hand to handlers.
    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }
}
