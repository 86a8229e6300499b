//! Shopfront Storage Layer
//!
//! SQLite-backed persistence for client-side state:
//! - Tab-scoped session storage (survives reloads, purged on tab close)
//! - Last known site settings, used as a read fallback

mod database;
mod error;
mod migrations;
mod scoped;

pub use database::Database;
pub use error::StorageError;
pub use scoped::{ScopeId, SessionStorage};

pub type Result<T> = std::result::Result<T, StorageError>;
