//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] shopfront_storage::StorageError),

    #[error("{0}")]
    Session(#[from] shopfront_session::SessionError),

    #[error("{0}")]
    Api(#[from] shopfront_api::ApiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A form value failed local checks; nothing was sent
    #[error("{0}")]
    Invalid(String),

    #[error("Administrator sign-in required")]
    Forbidden,
}
