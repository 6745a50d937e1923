//! Error taxonomy
//!
//! Every console operation fails with a [`ConsoleError`]. The `Display`
//! output of each variant is the message text alone, so it can be shown to
//! the user exactly as the backend produced it.

use thiserror::Error;

/// Errors surfaced by the admin console and the public content layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// Missing required input, caught before any network call
    #[error("{0}")]
    Validation(String),

    /// Login or session failure
    #[error("{0}")]
    Auth(String),

    /// Any data-store operation failure
    #[error("{0}")]
    Query(String),

    /// Upload or remove failure in object storage
    #[error("{0}")]
    Storage(String),

    /// An action referenced an identity the section does not hold
    #[error("{0}")]
    NotFound(String),

    /// The same operation is already running
    #[error("{0}")]
    Busy(String),
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(err: BackendError) -> Self {
        Self::Auth(err.message)
    }

    pub fn query(err: BackendError) -> Self {
        Self::Query(err.message)
    }

    pub fn storage(err: BackendError) -> Self {
        Self::Storage(err.message)
    }

    /// The verbatim message text
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Auth(m)
            | Self::Query(m)
            | Self::Storage(m)
            | Self::NotFound(m)
            | Self::Busy(m) => m,
        }
    }
}

/// Error returned by a backend collaborator (auth, data store, storage)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    /// Backend-specific error code, when one was reported
    pub code: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
