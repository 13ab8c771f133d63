//! Secret word supply.

use std::fs;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

/// Errors building a word list.
#[derive(Debug, Error)]
pub enum WordListError {
    /// The list could not be read.
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    /// Too few entries to make a fair game.
    #[error("word list has {0} words, need at least 100")]
    TooSmall(usize),
}

/// Source of candidate secret words.
///
/// Candidates come back trimmed but otherwise unvalidated; the game picks
/// through them for shape and length.
pub trait WordSource: Send + Sync {
    /// A uniformly chosen candidate word, or an empty string from an empty
    /// source.
    fn random_word(&self) -> String;
}

/// Word list loaded from a newline-delimited dictionary file.
#[derive(Debug)]
pub struct FileWordList {
    words: Vec<String>,
}

impl FileWordList {
    /// Entries a dictionary must have before it is worth playing against.
    pub const MIN_WORDS: usize = 100;

    /// Reads `path`, one word per line, skipping blank lines.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let content = fs::read_to_string(path)?;
        let words: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        if words.len() < Self::MIN_WORDS {
            return Err(WordListError::TooSmall(words.len()));
        }
        Ok(Self { words })
    }
}

impl WordSource for FileWordList {
    fn random_word(&self) -> String {
        let idx = rand::thread_rng().gen_range(0..self.words.len());
        self.words[idx].clone()
    }
}

/// Fixed in-memory word list, mainly for tests and embedders that bring
/// their own vocabulary.
#[derive(Debug)]
pub struct StaticWordList {
    words: Vec<String>,
}

impl StaticWordList {
    /// List over the given words, as-is.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordSource for StaticWordList {
    fn random_word(&self) -> String {
        if self.words.is_empty() {
            return String::new();
        }
        let idx = rand::thread_rng().gen_range(0..self.words.len());
        self.words[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_small_dictionaries_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..99 {
            writeln!(file, "word{i}").unwrap();
        }
        file.flush().unwrap();

        let err = FileWordList::load(file.path()).unwrap_err();
        assert!(matches!(err, WordListError::TooSmall(99)));
    }

    #[test]
    fn test_blank_lines_do_not_count_as_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..100 {
            writeln!(file, "word{i}\n").unwrap();
        }
        file.flush().unwrap();

        let list = FileWordList::load(file.path()).unwrap();
        assert!(list.random_word().starts_with("word"));
    }

    #[test]
    fn test_static_list_yields_its_words() {
        let list = StaticWordList::new(["apple"]);
        assert_eq!(list.random_word(), "apple");
        assert_eq!(StaticWordList::new(Vec::<String>::new()).random_word(), "");
    }
}
