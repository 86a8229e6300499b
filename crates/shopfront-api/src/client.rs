//! HTTP client for the storefront backend

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::error::ApiError;
use crate::models::{
    Category, CategoryDraft, LoginGrant, Product, ProductDraft, SiteSettings, UserProfile,
};
use crate::Result;

const USER_AGENT: &str = concat!("shopfront/", env!("CARGO_PKG_VERSION"));

/// Filters for the product listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// Admin listings include hidden products
    pub include_inactive: bool,
}

impl ProductQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("category", category.trim().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        if self.include_inactive {
            pairs.push(("include_inactive", "true".to_string()));
        }
        pairs
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Base URL without a trailing slash
    base: String,
    bearer: Option<String>,
}

impl ApiClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let base = api_base.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base).map_err(|e| ApiError::InvalidBase(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidBase(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base,
            bearer: None,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// A client that sends `credential` as its bearer token. Shares the
    /// underlying connection pool.
    pub fn with_bearer(&self, credential: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            bearer: credential,
        }
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    // === Products ===

    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let request = self.request(Method::GET, &["api", "products"])?.query(&query.pairs());
        self.send_json(request).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        let request = self.request(Method::GET, &["api", "products", checked_id(id)?])?;
        self.send_json(request).await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let request = self.request(Method::POST, &["api", "products"])?.json(draft);
        self.send_json(request).await
    }

    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<Product> {
        let request = self
            .request(Method::PUT, &["api", "products", checked_id(id)?])?
            .json(draft);
        self.send_json(request).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &["api", "products", checked_id(id)?])?;
        self.send_empty(request).await
    }

    /// Flip a product between visible and hidden
    pub async fn toggle_product(&self, id: &str) -> Result<Product> {
        let request = self
            .request(Method::PATCH, &["api", "products", checked_id(id)?, "toggle"])?;
        self.send_json(request).await
    }

    // === Categories ===

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let request = self.request(Method::GET, &["api", "categories"])?;
        self.send_json(request).await
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        let request = self.request(Method::POST, &["api", "categories"])?.json(draft);
        self.send_json(request).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &["api", "categories", checked_id(id)?])?;
        self.send_empty(request).await
    }

    /// Ask the backend to install its default category set
    pub async fn seed_categories(&self) -> Result<()> {
        let request = self.request(Method::POST, &["api", "categories", "seed"])?;
        self.send_empty(request).await
    }

    // === Settings ===

    pub async fn get_settings(&self) -> Result<SiteSettings> {
        let request = self.request(Method::GET, &["api", "settings"])?;
        self.send_json(request).await
    }

    pub async fn update_settings(&self, settings: &SiteSettings) -> Result<SiteSettings> {
        let request = self.request(Method::PUT, &["api", "settings"])?.json(settings);
        self.send_json(request).await
    }

    // === Auth ===

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant> {
        let request = self
            .request(Method::POST, &["api", "auth", "login"])?
            .json(&LoginRequest { email, password });
        self.send_json(request).await
    }

    /// Profile for the bearer credential
    pub async fn me(&self) -> Result<UserProfile> {
        let request = self.request(Method::GET, &["api", "auth", "me"])?;
        self.send_json(request).await
    }

    // === Plumbing ===

    /// Base URL with `segments` appended, each percent-encoded as exactly
    /// one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base).map_err(|e| ApiError::InvalidBase(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBase(self.base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = %method, path = %url.path(), "API request");

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::from)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(status, &body);

        tracing::warn!(status = status.as_u16(), path = %path, message = %message, "API request rejected");

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// A resource id usable as a single path segment. Empty ids and dot
/// segments would address a different resource.
fn checked_id(id: &str) -> Result<&str> {
    match id.trim() {
        "" | "." | ".." => Err(ApiError::InvalidId(id.to_string())),
        trimmed => Ok(trimmed),
    }
}

/// Pull a human-readable message out of an error body
///
/// Accepts `{"message": ".."}`, `{"detail": ".."}` and validation-style
/// `{"detail": [{"msg": ".."}]}`.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status.as_u16());

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return fallback(),
    };

    for key in ["message", "detail", "error"] {
        match value.get(key) {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                if let Some(msg) = items
                    .iter()
                    .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                {
                    return msg.to_string();
                }
            }
            _ => {}
        }
    }

    fallback()
}
