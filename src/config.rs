//! Configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for these types.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Scripting engine configuration.
///
/// Every section is optional in the file; missing sections take their
/// defaults, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptConfig {
    /// Engine-wide settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Hangman plugin settings.
    #[serde(default)]
    pub hangman: HangmanConfig,
    /// Annoy plugin settings.
    #[serde(default)]
    pub annoy: AnnoyConfig,
}

impl ScriptConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ScriptConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Nick the engine speaks as when no originating service is known
    /// (e.g., loader startup notices).
    #[serde(default = "default_service")]
    pub service: String,
    /// Plugins loaded at startup, in order.
    #[serde(default = "default_autoload")]
    pub autoload: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            autoload: default_autoload(),
        }
    }
}

fn default_service() -> String {
    "ScriptServ".to_string()
}

fn default_autoload() -> Vec<String> {
    vec!["annoy".to_string(), "hangman".to_string()]
}

/// Hangman plugin settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HangmanConfig {
    /// Newline-delimited word list secret words are drawn from.
    #[serde(default = "default_dictionary")]
    pub dictionary: String,
}

impl Default for HangmanConfig {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
        }
    }
}

fn default_dictionary() -> String {
    "/usr/share/dict/words".to_string()
}

/// Annoy plugin settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnoyConfig {
    /// Announce nick changes to the operator channel.
    #[serde(default)]
    pub announce_nick_changes: bool,
    /// Channel nick-change announcements go to.
    #[serde(default = "default_announce_channel")]
    pub announce_channel: String,
}

impl Default for AnnoyConfig {
    fn default() -> Self {
        Self {
            announce_nick_changes: false,
            announce_channel: default_announce_channel(),
        }
    }
}

fn default_announce_channel() -> String {
    "#opers".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config: ScriptConfig = toml::from_str("").unwrap();
        assert_eq!(config.engine.service, "ScriptServ");
        assert_eq!(config.engine.autoload, vec!["annoy", "hangman"]);
        assert_eq!(config.hangman.dictionary, "/usr/share/dict/words");
        assert!(!config.annoy.announce_nick_changes);
        assert_eq!(config.annoy.announce_channel, "#opers");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: ScriptConfig = toml::from_str(
            r#"
            [engine]
            autoload = ["hangman"]

            [annoy]
            announce_nick_changes = true
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.service, "ScriptServ");
        assert_eq!(config.engine.autoload, vec!["hangman"]);
        assert!(config.annoy.announce_nick_changes);
        assert_eq!(config.annoy.announce_channel, "#opers");
    }
}
