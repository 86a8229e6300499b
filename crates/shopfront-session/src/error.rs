//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("A sign-in is already in progress")]
    SignInInProgress,

    #[error("Sign-in was superseded by a sign-out")]
    Superseded,

    #[error("{0}")]
    Rejected(String),

    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] shopfront_storage::StorageError),
}

impl From<AuthorityError> for SessionError {
    fn from(e: AuthorityError) -> Self {
        match e {
            AuthorityError::Rejected(message) => SessionError::Rejected(message),
            AuthorityError::Unavailable(message) => SessionError::Unavailable(message),
        }
    }
}

/// Failure reported by the remote authority
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// The authority answered and said no
    #[error("{0}")]
    Rejected(String),

    /// No usable answer
    #[error("{0}")]
    Unavailable(String),
}

impl From<shopfront_api::ApiError> for AuthorityError {
    fn from(e: shopfront_api::ApiError) -> Self {
        match e {
            shopfront_api::ApiError::Rejected { message, .. } => AuthorityError::Rejected(message),
            other => AuthorityError::Unavailable(other.to_string()),
        }
    }
}
