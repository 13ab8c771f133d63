//! Hangman: a word-guessing game played per channel or query partner.
//!
//! Each reply target gets at most one live game. Game output goes to the
//! target unprefixed so the gallows renders cleanly; complaints about the
//! command itself (no game here, etc.) go through normal reply routing.

mod game;
mod words;

pub use game::{Game, GameState, GuessError, GuessOutcome, MISS_LIMIT};
pub use words::{FileWordList, StaticWordList, WordListError, WordSource};

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::config::ScriptConfig;
use crate::context::EventContext;
use crate::error::LoadError;
use crate::hooks::{EventHandler, HookAction, HookBinder, HookResult};
use crate::plugins::Plugin;

/// Word selection gives up after this many draws.
const PICK_ATTEMPTS: usize = 10;

/// The hangman plugin: session table plus a word source.
pub struct Hangman {
    games: DashMap<String, Game>,
    words: Arc<dyn WordSource>,
    valid: Regex,
}

impl Hangman {
    /// Built-in constructor: draws words from the configured dictionary.
    pub fn construct(config: &ScriptConfig) -> Result<Arc<dyn Plugin>, LoadError> {
        let words = FileWordList::load(&config.hangman.dictionary).map_err(|e| LoadError::Init {
            plugin: "hangman".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(Hangman::with_words(Arc::new(words))))
    }

    /// Plugin over an explicit word source. Spares tests and embedders the
    /// filesystem.
    pub fn with_words(words: Arc<dyn WordSource>) -> Self {
        Self {
            games: DashMap::new(),
            words,
            // the pattern is a literal; it compiles
            valid: Regex::new("^[a-zA-Z]+$").expect("valid word pattern"),
        }
    }

    fn pick_word(&self, length: usize) -> Option<String> {
        for _ in 0..PICK_ATTEMPTS {
            let candidate = self.words.random_word();
            if candidate.chars().count() == length && self.valid.is_match(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Game-voice output: unprefixed, straight to the session target.
    async fn game_reply(&self, ctx: &EventContext, key: &str, text: &str) {
        ctx.host.send_target_privmsg(&ctx.service, key, text).await;
    }

    async fn send_status(&self, ctx: &EventContext, key: &str, game: &Game) {
        for line in game.status_lines() {
            self.game_reply(ctx, key, &line).await;
        }
    }

    async fn start(&self, ctx: &EventContext, arg: &str) {
        let key = ctx.reply_target().to_string();

        let live = self
            .games
            .get(&key)
            .map(|game| game.state() == GameState::InProgress)
            .unwrap_or(false);
        if live {
            ctx.reply("There is a game is in progress here, End it before you start another.")
                .await;
            return;
        }

        let length = match arg.trim().parse::<usize>() {
            Ok(n) if n > 3 && n < 100 => n,
            _ => rand::thread_rng().gen_range(5..9),
        };

        let Some(word) = self.pick_word(length) else {
            self.game_reply(ctx, &key, &format!("Error finding a {length} letter word"))
                .await;
            self.game_reply(ctx, &key, "Aborting game").await;
            return;
        };

        // Operators can read the answer from the log; players cannot.
        debug!(target = %key, word = %word, "secret word chosen");

        let game = Game::new(word);
        self.game_reply(ctx, &key, "HANGMAN is starting!").await;
        self.send_status(ctx, &key, &game).await;
        self.games.insert(key, game);
    }

    async fn guess(&self, ctx: &EventContext, arg: &str) {
        let key = ctx.reply_target().to_string();
        let input = arg.trim();

        // Collect output under the session guard, send after it drops.
        let lines = match self.games.get_mut(&key) {
            None => {
                ctx.reply("No game here in progress. Start one!").await;
                return;
            }
            Some(mut game) => match game.guess(input) {
                Err(e) => vec![e.to_string()],
                Ok(GuessOutcome::Repeat) => {
                    let mut lines = vec![format!(
                        "Pay attention! {input} has already been guessed! I'm hanging you anyway!"
                    )];
                    lines.extend(game.status_lines());
                    lines
                }
                Ok(GuessOutcome::Hit) => {
                    let mut lines = Vec::new();
                    if game.state() == GameState::InProgress {
                        lines.push("YOU GOT ONE! But I'll hang you yet!!".to_string());
                    }
                    lines.extend(game.status_lines());
                    lines
                }
                Ok(GuessOutcome::Miss) => {
                    let mut lines = vec!["NO! MuaHaHaHaHa!".to_string()];
                    lines.extend(game.status_lines());
                    lines
                }
            },
        };

        for line in lines {
            self.game_reply(ctx, &key, &line).await;
        }
    }

    async fn end(&self, ctx: &EventContext) {
        let key = ctx.reply_target().to_string();
        if self.games.remove(&key).is_some() {
            self.game_reply(ctx, &key, &format!("Game ended by {}", ctx.actor))
                .await;
        } else {
            ctx.reply("No game here to end").await;
        }
    }
}

#[async_trait]
impl Plugin for Hangman {
    fn name(&self) -> &'static str {
        "hangman"
    }

    async fn on_load(
        self: Arc<Self>,
        binder: &mut HookBinder,
        _ctx: &EventContext,
    ) -> Result<(), LoadError> {
        binder.command("start", Arc::new(StartHandler(Arc::clone(&self))))?;
        binder.command("end", Arc::new(EndHandler(Arc::clone(&self))))?;
        binder.command("guess", Arc::new(GuessHandler(Arc::clone(&self))))?;
        Ok(())
    }
}

struct StartHandler(Arc<Hangman>);

#[async_trait]
impl EventHandler for StartHandler {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        let arg = args.first().map(String::as_str).unwrap_or("");
        self.0.start(ctx, arg).await;
        Ok(HookAction::Handled)
    }
}

struct GuessHandler(Arc<Hangman>);

#[async_trait]
impl EventHandler for GuessHandler {
    async fn handle(&self, ctx: &EventContext, args: &[String]) -> HookResult {
        let arg = args.first().map(String::as_str).unwrap_or("");
        self.0.guess(ctx, arg).await;
        Ok(HookAction::Handled)
    }
}

struct EndHandler(Arc<Hangman>);

#[async_trait]
impl EventHandler for EndHandler {
    async fn handle(&self, ctx: &EventContext, _args: &[String]) -> HookResult {
        self.0.end(ctx).await;
        Ok(HookAction::Handled)
    }
}
