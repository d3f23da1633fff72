use thiserror::Error;

pub type Result<T> = std::result::Result<T, VentraError>;

/// Errors produced by the core library.
///
/// Collaborator variants carry the raw message string from the service;
/// callers surface it verbatim, so keep these human-readable.
#[derive(Error, Debug)]
pub enum VentraError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    Blob(String),

    #[error("{0}")]
    Api(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
