//! Game state machine: one secret word, one gallows.
//!
//! Pure state, no IO. The plugin owns the session table and turns these
//! transitions into chat lines.

use std::collections::BTreeSet;

use thiserror::Error;

/// Misses at which the game is lost.
pub const MISS_LIMIT: u8 = 7;

const MASK_CHAR: char = '*';

/// Where a game stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    /// Guessing is open.
    InProgress,
    /// Every letter was revealed before the gallows filled.
    Won,
    /// The gallows filled first.
    Lost,
}

/// Rejected guess. Carries the complaint the player sees; never a fault,
/// and never a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GuessError {
    /// More than one character was offered.
    #[error("Guess a single letter only, please.")]
    MultipleLetters,
    /// Empty or non-alphabetic input.
    #[error("Letters only. Punctuation will be filled in for you.")]
    NotALetter,
    /// The game already ended.
    #[error("This game is over. Start another!")]
    Finished,
}

/// What an accepted guess did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter is in the word.
    Hit,
    /// The letter is not in the word; the gallows grew.
    Miss,
    /// The letter was guessed before; the gallows grew anyway.
    Repeat,
}

/// One hangman game.
#[derive(Clone, Debug)]
pub struct Game {
    word: String,
    guesses: BTreeSet<char>,
    misses: u8,
}

impl Game {
    /// Fresh game over `word`.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            guesses: BTreeSet::new(),
            misses: 0,
        }
    }

    /// The secret word. Server-side only; the chat surface shows
    /// [`masked`](Self::masked).
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Misses so far.
    pub fn misses(&self) -> u8 {
        self.misses
    }

    /// Where the game stands. Lost wins over Won when both would apply.
    pub fn state(&self) -> GameState {
        if self.misses >= MISS_LIMIT {
            GameState::Lost
        } else if self
            .word
            .chars()
            .all(|c| !c.is_alphabetic() || self.guesses.contains(&c))
        {
            GameState::Won
        } else {
            GameState::InProgress
        }
    }

    /// Applies one guess.
    ///
    /// A repeated letter is the "pay attention" penalty: it costs a miss
    /// like a wrong guess, and can itself lose the game. Validation
    /// failures change nothing.
    pub fn guess(&mut self, input: &str) -> Result<GuessOutcome, GuessError> {
        if self.state() != GameState::InProgress {
            return Err(GuessError::Finished);
        }
        if input.chars().count() > 1 {
            return Err(GuessError::MultipleLetters);
        }
        let letter = match input.chars().next() {
            Some(c) if c.is_alphabetic() => c,
            _ => return Err(GuessError::NotALetter),
        };

        if self.guesses.contains(&letter) {
            self.misses += 1;
            return Ok(GuessOutcome::Repeat);
        }

        self.guesses.insert(letter);
        if self.word.contains(letter) {
            Ok(GuessOutcome::Hit)
        } else {
            self.misses += 1;
            Ok(GuessOutcome::Miss)
        }
    }

    /// The word as the players see it: guessed letters and non-alphabetic
    /// characters verbatim, everything else masked.
    pub fn masked(&self) -> String {
        self.word
            .chars()
            .map(|c| {
                if !c.is_alphabetic() || self.guesses.contains(&c) {
                    c
                } else {
                    MASK_CHAR
                }
            })
            .collect()
    }

    /// Lines shown after every state change: the gallows, the masked word,
    /// and the verdict once the game is over.
    pub fn status_lines(&self) -> Vec<String> {
        let part = |threshold: u8, part: &'static str| {
            if self.misses >= threshold { part } else { " " }
        };

        let mut lines = vec![
            format!(" /---{}", part(1, ",")),
            format!(" |   {}       Make", part(2, "o")),
            format!(
                " |  {}{}{}      your",
                part(4, "/"),
                part(3, "|"),
                part(5, "\\")
            ),
            format!(" |  {} {}      guess!", part(6, "/"), part(7, "\\")),
            " ====".to_string(),
            self.masked(),
        ];
        match self.state() {
            GameState::Won => lines.push("YOU WON! FOR NOW!!".to_string()),
            GameState::Lost => lines.push("Your DEAD! DEAAAAAAAD!".to_string()),
            GameState::InProgress => {}
        }

        lines.into_iter().map(|l| l.trim_end().to_string()).collect()
    }
}
