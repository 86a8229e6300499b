//! Shopfront API Client
//!
//! Thin typed wrapper over the storefront backend. The backend owns all
//! business rules; this crate only shapes requests, attaches the bearer
//! credential and sorts failures into:
//! - transport failures (no response)
//! - rejections (HTTP error status, with the server's message when present)
//! - malformed responses

mod client;
mod error;
mod models;

pub use client::{ApiClient, ProductQuery};
pub use error::ApiError;
pub use models::{
    Category, CategoryDraft, LoginGrant, Product, ProductDraft, SiteSettings, UserProfile,
};

pub type Result<T> = std::result::Result<T, ApiError>;
