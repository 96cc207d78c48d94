//! Error type shared by the fetch, parse and config layers.
//!
//! Nothing here ever reaches the user as a raw error: the ingestion cycle
//! turns every [`FeedError`] into a placeholder on the rendering surface, and
//! `main` wraps startup errors in [`anyhow`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("proxy answered with HTTP status {0}")]
    Status(u16),

    #[error("proxy envelope is not valid JSON: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("proxy envelope has no `contents` field")]
    MissingContents,

    #[error("feed markup could not be parsed: {0}")]
    Parse(#[from] rss::Error),

    #[error("entry is missing required field `{field}`")]
    MalformedEntry { field: &'static str },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FeedError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the request hit the client timeout rather than failing outright.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
