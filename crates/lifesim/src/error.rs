//! Error types for the engine.
//!
//! Only malformed input is an error. Out-of-range settings are clamped and
//! the text decoders return partial results instead of failing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeError {
    /// The file name does not end in a recognised pattern suffix.
    #[error("Unsupported file type '{0}'. Please use .rle, .lif, .lif.txt or .json")]
    UnsupportedFormat(String),

    /// A saved cell key is not of the form `row,col`.
    #[error("Invalid cell key: {0:?}")]
    InvalidKey(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LifeError>;

impl LifeError {
    #[must_use]
    pub fn unsupported<S: Into<String>>(name: S) -> Self {
        Self::UnsupportedFormat(name.into())
    }

    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
