use thiserror::Error;

/// Errors from emulator operations. All of them are caller mistakes except
/// `Poisoned`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocDbError {
    #[error("no writes")]
    NoWrites,

    #[error("missing name")]
    MissingName,

    #[error("no documents")]
    NoDocuments,

    #[error("document map lock poisoned: {0}")]
    Poisoned(String),
}

impl DocDbError {
    /// `true` for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Poisoned(_))
    }
}

/// Result alias for emulator operations.
pub type DocDbResult<T> = Result<T, DocDbError>;
