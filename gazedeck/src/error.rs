//! Construction-time error types.
//!
//! The per-frame core never fails; only deck building and configuration
//! loading can reject input.

use thiserror::Error;

/// Malformed deck description, rejected before a session starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck is empty")]
    EmptyDeck,

    #[error("card '{path}' has both an action and children; a card is either a leaf or a menu")]
    AmbiguousCard { path: String },

    #[error("card '{path}' has neither an action nor children")]
    MissingAction { path: String },

    #[error("menu '{path}' has no children")]
    EmptyMenu { path: String },

    #[error("card '{path}' refers to unknown action '{action}'")]
    UnknownAction { path: String, action: String },

    #[error("card at '{path}' has an empty label")]
    EmptyLabel { path: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Deck(#[from] DeckError),
}
