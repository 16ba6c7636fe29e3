use std::fmt;
use thiserror::Error;

/// Boxed underlying cause carried by [`Error::Lookup`] and [`Error::Fetch`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which user input was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Title,
    Url,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Title => f.write_str("book title"),
            InputKind::Url => f.write_str("Project Gutenberg URL"),
        }
    }
}

/// Failures reported by a [`crate::fetch::Fetch`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),
    #[error("encoding: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Please enter a {0}.")]
    EmptyInput(InputKind),
    #[error("Oh No! No book found with that title: '{title}'")]
    NotFound { title: String },
    #[error("Looks like the search for '{title}' has failed: {source}")]
    Lookup {
        title: String,
        #[source]
        source: Cause,
    },
    #[error("Failed to load book from URL {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Cause,
    },
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Blank input is the only case the user can fix by retyping.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::EmptyInput(_))
    }

    pub(crate) fn lookup(title: &str, source: impl Into<Cause>) -> Self {
        Error::Lookup { title: title.to_string(), source: source.into() }
    }

    pub(crate) fn fetch(url: &str, source: impl Into<Cause>) -> Self {
        Error::Fetch { url: url.to_string(), source: source.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
