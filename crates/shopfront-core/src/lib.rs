//! Shopfront Core
//!
//! Central coordination layer: one `Storefront` per tab owns the database,
//! API client, session gate and image normalizers. Nothing is global.

mod config;
mod drafts;
mod error;
mod storefront;
mod watcher;

pub use config::{Config, API_BASE_ENV, DISPLAY_NAME_ENV};
pub use drafts::{parse_price, prepare_category, prepare_product};
pub use error::CoreError;
pub use storefront::Storefront;
pub use watcher::{SettingsSource, SettingsWatch};

// Re-export components
pub use shopfront_api::{
    ApiClient, ApiError, Category, CategoryDraft, Product, ProductDraft, ProductQuery,
    SiteSettings,
};
pub use shopfront_images::{ImageResolution, ImageResolver, LinkCanonicalizer, PLACEHOLDER_PATH};
pub use shopfront_session::{
    Access, Authority, Credential, GateState, Privilege, Profile, SessionError, SessionGate,
};
pub use shopfront_storage::{Database, ScopeId, SessionStorage, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
