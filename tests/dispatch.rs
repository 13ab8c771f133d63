//! Registry and dispatcher properties: ordering, filtering, short-circuit,
//! error propagation, counters, reply routing.

mod common;
use common::TestHost;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use slirc_script::{
    Dispatcher, EventContext, EventFilter, EventHandler, EventKind, EventOrigin, HandlerError,
    Hook, HookAction, HookRegistry, HookResult, RegistrationError,
};

type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// Records its label, then continues or claims as configured.
struct Recorder {
    label: &'static str,
    action: HookAction,
    log: CallLog,
}

#[async_trait]
impl EventHandler for Recorder {
    async fn handle(&self, _ctx: &EventContext, _args: &[String]) -> HookResult {
        self.log.lock().push(self.label);
        Ok(self.action)
    }
}

/// Fails every delivery it sees.
struct Failing;

#[async_trait]
impl EventHandler for Failing {
    async fn handle(&self, _ctx: &EventContext, _args: &[String]) -> HookResult {
        Err(HandlerError::Internal("synthetic handler fault".to_string()))
    }
}

/// Captures the call arguments handlers are invoked with.
struct ArgsCapture {
    log: Arc<Mutex<Vec<Vec<String>>>>,
}

#[async_trait]
impl EventHandler for ArgsCapture {
    async fn handle(&self, _ctx: &EventContext, args: &[String]) -> HookResult {
        self.log.lock().push(args.to_vec());
        Ok(HookAction::Continue)
    }
}

/// Replies through the context, to exercise routing.
struct Echo;

#[async_trait]
impl EventHandler for Echo {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        ctx.reply(&format!("saw {}", args.join(" "))).await;
        Ok(HookAction::Handled)
    }
}

fn recorder(label: &'static str, action: HookAction, log: &CallLog) -> Arc<dyn EventHandler> {
    Arc::new(Recorder {
        label,
        action,
        log: Arc::clone(log),
    })
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn channel_origin() -> EventOrigin {
    EventOrigin::channel("alice", "ScriptServ", "#lobby")
}

#[tokio::test]
async fn test_first_claim_stops_dispatch() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        recorder("first", HookAction::Handled, &log),
        "p1",
        None,
    )?);
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        recorder("second", HookAction::Continue, &log),
        "p2",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, TestHost::new());
    let data = strings(&["#lobby", "alice"]);
    let handled = dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await?;

    assert!(handled);
    assert_eq!(*log.lock(), vec!["first"]);
    Ok(())
}

#[tokio::test]
async fn test_all_continue_is_unhandled() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    for label in ["first", "second"] {
        registry.add(Hook::new(
            EventKind::Join,
            EventFilter::any(2),
            recorder(label, HookAction::Continue, &log),
            label,
            None,
        )?);
    }

    let dispatcher = Dispatcher::new(registry, TestHost::new());
    let data = strings(&["#lobby", "alice"]);
    let handled = dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await?;

    assert!(!handled);
    assert_eq!(*log.lock(), vec!["first", "second"]);
    Ok(())
}

#[tokio::test]
async fn test_filters_gate_matching() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::exact(["#lobby", "alice"]),
        recorder("exact", HookAction::Continue, &log),
        "p1",
        None,
    )?);
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        recorder("wildcard", HookAction::Continue, &log),
        "p2",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, TestHost::new());

    let data = strings(&["#lobby", "alice"]);
    dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await?;
    assert_eq!(*log.lock(), vec!["exact", "wildcard"]);

    log.lock().clear();
    let data = strings(&["#dev", "bob"]);
    dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await?;
    assert_eq!(*log.lock(), vec!["wildcard"]);
    Ok(())
}

#[tokio::test]
async fn test_command_filters_are_case_sensitive() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Command,
        EventFilter::exact(["annoy", "dance"]),
        recorder("dance", HookAction::Handled, &log),
        "annoy",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, TestHost::new());
    let args = strings(&[""]);

    let handled = dispatcher
        .deliver(
            EventKind::Command,
            channel_origin(),
            &strings(&["annoy", "Dance"]),
            &args,
        )
        .await?;
    assert!(!handled);
    assert!(log.lock().is_empty());

    let handled = dispatcher
        .deliver(
            EventKind::Command,
            channel_origin(),
            &strings(&["annoy", "dance"]),
            &args,
        )
        .await?;
    assert!(handled);
    Ok(())
}

#[test]
fn test_registration_rejects_arity_mismatch() {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let err = Hook::new(
        EventKind::Join,
        EventFilter::any(3),
        recorder("never", HookAction::Continue, &log),
        "p1",
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::FilterArity {
            event: EventKind::Join,
            expected: 2,
            got: 3,
        }
    );
}

#[tokio::test]
async fn test_new_user_filters_wide_and_calls_narrow() -> anyhow::Result<()> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::NewUser,
        EventFilter::from_slots(vec![None, None, Some("example.org".to_string()), None]),
        Arc::new(ArgsCapture {
            log: Arc::clone(&captured),
        }),
        "watcher",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, TestHost::new());

    // Four filter slots, one call argument
    dispatcher
        .deliver(
            EventKind::NewUser,
            channel_origin(),
            &strings(&["neo", "anon", "example.org", "Thomas Anderson"]),
            &strings(&["neo"]),
        )
        .await?;
    assert_eq!(*captured.lock(), vec![strings(&["neo"])]);

    // Hostname slot does not match; handler never runs
    dispatcher
        .deliver(
            EventKind::NewUser,
            channel_origin(),
            &strings(&["smith", "agent", "matrix.gov", "Agent Smith"]),
            &strings(&["smith"]),
        )
        .await?;
    assert_eq!(captured.lock().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_handler_error_aborts_that_delivery_only() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        recorder("first", HookAction::Continue, &log),
        "p1",
        None,
    )?);
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        Arc::new(Failing),
        "p2",
        None,
    )?);
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        recorder("third", HookAction::Continue, &log),
        "p3",
        None,
    )?);

    let dispatcher = Dispatcher::new(Arc::clone(&registry), TestHost::new());
    let data = strings(&["#lobby", "alice"]);

    let err = dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Internal(_)));
    // The hook after the fault never ran, and the registry survived
    assert_eq!(*log.lock(), vec!["first"]);
    assert_eq!(registry.len(), 3);

    // The next delivery starts clean
    let err = dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Internal(_)));
    assert_eq!(*log.lock(), vec!["first", "first"]);
    Ok(())
}

#[tokio::test]
async fn test_delivery_stats_count_and_sort() -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(Arc::new(HookRegistry::new()), TestHost::new());
    let data = strings(&["#lobby", "alice"]);

    for _ in 0..3 {
        dispatcher
            .deliver(EventKind::Join, channel_origin(), &data, &data)
            .await?;
    }
    dispatcher
        .deliver(
            EventKind::Command,
            channel_origin(),
            &strings(&["annoy", "dance"]),
            &strings(&[""]),
        )
        .await?;

    let stats = dispatcher.delivery_stats();
    assert_eq!(stats, vec![(EventKind::Join, 3), (EventKind::Command, 1)]);
    Ok(())
}

#[tokio::test]
async fn test_reply_routing_channel_and_direct() -> anyhow::Result<()> {
    let host = TestHost::new();
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Join,
        EventFilter::any(2),
        Arc::new(Echo),
        "echo",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, Arc::clone(&host) as _);

    // Channel event: reply lands in the channel, addressed to the actor
    let data = strings(&["#lobby", "alice"]);
    dispatcher
        .deliver(EventKind::Join, channel_origin(), &data, &data)
        .await?;
    // Direct event: reply goes straight back, unprefixed
    let data = strings(&["#dev", "bob"]);
    dispatcher
        .deliver(
            EventKind::Join,
            EventOrigin::direct("bob", "ScriptServ"),
            &data,
            &data,
        )
        .await?;

    let sent = host.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].source, "ScriptServ");
    assert_eq!(sent[0].target, "#lobby");
    assert_eq!(sent[0].text, "alice: saw #lobby alice");
    assert_eq!(sent[1].target, "bob");
    assert_eq!(sent[1].text, "saw #dev bob");
    Ok(())
}

#[tokio::test]
async fn test_wildcard_command_hook_sees_every_command() -> anyhow::Result<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(HookRegistry::new());
    registry.add(Hook::new(
        EventKind::Command,
        EventFilter::any(2),
        recorder("audit", HookAction::Continue, &log),
        "audit",
        None,
    )?);
    registry.add(Hook::new(
        EventKind::Command,
        EventFilter::exact(["hangman", "start"]),
        recorder("start", HookAction::Handled, &log),
        "hangman",
        None,
    )?);

    let dispatcher = Dispatcher::new(registry, TestHost::new());
    let args = strings(&[""]);

    let handled = dispatcher
        .deliver(
            EventKind::Command,
            channel_origin(),
            &strings(&["hangman", "start"]),
            &args,
        )
        .await?;
    assert!(handled);
    assert_eq!(*log.lock(), vec!["audit", "start"]);

    let handled = dispatcher
        .deliver(
            EventKind::Command,
            channel_origin(),
            &strings(&["annoy", "dance"]),
            &args,
        )
        .await?;
    assert!(!handled);
    assert_eq!(*log.lock(), vec!["audit", "start", "audit"]);
    Ok(())
}
