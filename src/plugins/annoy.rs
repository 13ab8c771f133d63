//! Annoy: joke commands, plus an optional nick-change announcer for the
//! operator channel.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AnnoyConfig, ScriptConfig};
use crate::context::EventContext;
use crate::error::LoadError;
use crate::event::EventKind;
use crate::hooks::{EventFilter, EventHandler, HookAction, HookBinder, HookResult};
use crate::plugins::Plugin;

/// The annoy plugin.
pub struct Annoy {
    cfg: AnnoyConfig,
}

impl Annoy {
    /// Built-in constructor.
    pub fn construct(config: &ScriptConfig) -> Result<Arc<dyn Plugin>, LoadError> {
        Ok(Arc::new(Annoy {
            cfg: config.annoy.clone(),
        }))
    }

    async fn dance(&self, ctx: &EventContext, args: &str) {
        let user = ctx.host.get_user(&ctx.actor).await;

        let mut reply = String::from("Ok,");
        if let Some(account) = user.and_then(|u| u.account) {
            reply.push_str(" Mr. ");
            reply.push_str(&account);
        }
        reply.push_str(" we can dance");
        if !args.is_empty() {
            reply.push(' ');
            reply.push_str(args);
        }
        reply.push('.');

        ctx.reply(&reply).await;
    }

    async fn nickof(&self, ctx: &EventContext, role: &str) {
        let info = ctx.host.get_service_info().await;
        match info.get(role) {
            Some(nick) if !role.is_empty() => {
                ctx.reply(&format!("{role} has nick {nick}")).await;
            }
            _ => {
                let mut roles: Vec<&str> = info.keys().map(String::as_str).collect();
                roles.sort_unstable();
                ctx.reply(&format!("I dunno. Try one of: {}", roles.join(", ")))
                    .await;
            }
        }
    }
}

#[async_trait]
impl Plugin for Annoy {
    fn name(&self) -> &'static str {
        "annoy"
    }

    async fn on_load(
        self: Arc<Self>,
        binder: &mut HookBinder,
        _ctx: &EventContext,
    ) -> Result<(), LoadError> {
        binder.command("dance", Arc::new(DanceHandler(Arc::clone(&self))))?;
        binder.command("nickof", Arc::new(NickofHandler(Arc::clone(&self))))?;

        if self.cfg.announce_nick_changes {
            binder.hook_with_data(
                EventKind::NickChange,
                EventFilter::any(2),
                Arc::new(NickChangeAnnouncer {
                    channel: self.cfg.announce_channel.clone(),
                }),
                Some("ops-announce".to_string()),
            )?;
        }
        Ok(())
    }
}

struct DanceHandler(Arc<Annoy>);

#[async_trait]
impl EventHandler for DanceHandler {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        let arg = args.first().map(String::as_str).unwrap_or("");
        self.0.dance(ctx, arg).await;
        Ok(HookAction::Handled)
    }
}

struct NickofHandler(Arc<Annoy>);

#[async_trait]
impl EventHandler for NickofHandler {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        let arg = args.first().map(String::as_str).unwrap_or("").trim();
        self.0.nickof(ctx, arg).await;
        Ok(HookAction::Handled)
    }
}

/// Tells the operator channel about nick changes, speaking as OperServ when
/// the daemon knows its nick. Observes without claiming so other plugins
/// still see the event.
struct NickChangeAnnouncer {
    channel: String,
}

#[async_trait]
impl EventHandler for NickChangeAnnouncer {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        let nick = args.first().map(String::as_str).unwrap_or("");
        let old_nick = args.get(1).map(String::as_str).unwrap_or("");

        let info = ctx.host.get_service_info().await;
        let source = info
            .get("operserv")
            .cloned()
            .unwrap_or_else(|| ctx.service.clone());

        ctx.host
            .send_target_privmsg(
                &source,
                &self.channel,
                &format!("{old_nick} changed nick to {nick}"),
            )
            .await;
        Ok(HookAction::Continue)
    }
}
