//! Main storefront state container
//!
//! One `Storefront` per tab. It owns the database handle, the API client,
//! the session gate and the image normalizers; nothing lives in globals.

use async_trait::async_trait;
use std::sync::Arc;

use shopfront_api::{
    ApiClient, ApiError, Category, CategoryDraft, Product, ProductDraft, ProductQuery,
    SiteSettings,
};
use shopfront_images::{ImageResolution, ImageResolver, LinkCanonicalizer};
use shopfront_session::{Access, Authority, GateState, Privilege, Profile, SessionGate};
use shopfront_storage::{Database, ScopeId, SessionStorage};

use crate::config::Config;
use crate::drafts::{prepare_category, prepare_product};
use crate::error::CoreError;
use crate::watcher::{SettingsSource, SettingsWatch};
use crate::Result;

const SETTINGS_CACHE_KEY: &str = "site_settings";

/// Main storefront instance
pub struct Storefront {
    config: Config,
    db: Database,
    api: ApiClient,
    gate: SessionGate,
    images: ImageResolver,
    links: LinkCanonicalizer,
}

impl Storefront {
    /// Open the storefront for one tab
    pub fn open(config: Config, scope: ScopeId) -> Result<Self> {
        config.validate()?;

        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let api = ApiClient::new(&config.api_base, config.request_timeout())?;
        let authority: Arc<dyn Authority> = Arc::new(api.clone());

        Self::from_parts(config, db, api, authority, scope)
    }

    /// Assemble from already-built parts. Sweeps abandoned scopes, then
    /// restores this tab's session.
    pub fn from_parts(
        config: Config,
        db: Database,
        api: ApiClient,
        authority: Arc<dyn Authority>,
        scope: ScopeId,
    ) -> Result<Self> {
        if let Err(e) = db.sweep_idle_scopes(config.scope_idle_ttl()) {
            tracing::warn!(error = %e, "Failed to sweep idle session scopes");
        }

        let gate = SessionGate::open(SessionStorage::new(db.clone(), scope), authority)?;
        let images = ImageResolver::new(api.base());

        tracing::info!(
            api_base = %api.base(),
            scope = %gate.storage().scope(),
            "Storefront opened"
        );

        Ok(Self {
            config,
            db,
            api,
            gate,
            images,
            links: LinkCanonicalizer::new(),
        })
    }

    /// Confirm any restored credential. Until this resolves, protected views
    /// see `Access::Pending`.
    pub async fn initialize(&self) -> GateState {
        let state = self.gate.verify_stored_credential().await;
        tracing::info!(state = %state, "Storefront initialized");
        state
    }

    /// Tab teardown: the scope's session entries are purged
    pub fn close(self) -> Result<()> {
        self.gate.storage().close()?;
        tracing::info!(scope = %self.gate.storage().scope(), "Storefront closed");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display_name(&self) -> &str {
        &self.config.display_name
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn scope(&self) -> &ScopeId {
        self.gate.storage().scope()
    }

    // === Session ===

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile> {
        Ok(self.gate.sign_in(email, password).await?)
    }

    pub async fn sign_out(&self) {
        self.gate.sign_out().await;
    }

    pub fn access(&self, required: Privilege) -> Access {
        self.gate.access(required)
    }

    // === Images ===

    /// Display URL for a stored image reference
    pub fn image_url(&self, reference: Option<&str>) -> String {
        self.images.resolve(reference)
    }

    pub fn image_resolution(&self, reference: Option<&str>) -> ImageResolution {
        self.images.resolve_detailed(reference)
    }

    /// Storage form for a link pasted into an admin form
    pub fn canonical_image_link(&self, link: &str) -> String {
        self.links.canonicalize(link)
    }

    // === Public reads ===

    /// Client carrying the cached credential, if any
    fn reader(&self) -> ApiClient {
        self.api
            .with_bearer(self.gate.credential().map(|c| c.expose().to_string()))
    }

    pub async fn products(&self, query: &ProductQuery) -> Vec<Product> {
        match self.reader().list_products(query).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load products");
                Vec::new()
            }
        }
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        if id.trim().is_empty() {
            return None;
        }

        match self.reader().get_product(id.trim()).await {
            Ok(product) => Some(product),
            Err(e) if e.is_not_found() => {
                tracing::debug!(product_id = %id, "Product not found");
                None
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Failed to load product");
                None
            }
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        match self.reader().list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories");
                Vec::new()
            }
        }
    }

    /// Current settings, falling back to the last good read, then defaults
    pub async fn site_settings(&self) -> SiteSettings {
        match self.reader().get_settings().await {
            Ok(settings) => {
                cache_settings(&self.db, &settings);
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load site settings");
                self.cached_settings().unwrap_or_default()
            }
        }
    }

    pub fn cached_settings(&self) -> Option<SiteSettings> {
        cached_settings(&self.db)
    }

    /// Poll the settings in the background, seeded with the cached value
    pub fn watch_settings(&self) -> SettingsWatch {
        let source = CachingSettings {
            api: self.api.clone(),
            db: self.db.clone(),
        };
        SettingsWatch::spawn(
            Arc::new(source),
            self.config.settings_poll_interval(),
            self.cached_settings(),
        )
    }

    // === Admin ===

    /// Client for back-office calls. Refused locally unless the gate has
    /// confirmed an administrator.
    fn admin(&self) -> Result<ApiClient> {
        if !self.gate.is_authorized_for(Privilege::Admin) {
            return Err(CoreError::Forbidden);
        }
        Ok(self
            .api
            .with_bearer(self.gate.credential().map(|c| c.expose().to_string())))
    }

    fn settle<T>(&self, outcome: std::result::Result<T, ApiError>) -> Result<T> {
        if let Err(e) = &outcome {
            if e.is_unauthorized() {
                self.gate.mark_expired();
            }
        }
        outcome.map_err(CoreError::from)
    }

    /// Every product, inactive ones included
    pub async fn admin_products(&self) -> Result<Vec<Product>> {
        let api = self.admin()?;
        let query = ProductQuery {
            include_inactive: true,
            ..ProductQuery::default()
        };
        self.settle(api.list_products(&query).await)
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        let api = self.admin()?;
        let draft = prepare_product(draft, &self.links)?;

        let product = self.settle(api.create_product(&draft).await)?;
        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, draft: ProductDraft) -> Result<Product> {
        let api = self.admin()?;
        let id = required_id(id, "Product")?;
        let draft = prepare_product(draft, &self.links)?;

        let product = self.settle(api.update_product(id, &draft).await)?;
        tracing::info!(product_id = %product.id, "Updated product");
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let api = self.admin()?;
        let id = required_id(id, "Product")?;

        self.settle(api.delete_product(id).await)?;
        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }

    /// Flip a product's visibility; returns the updated product
    pub async fn toggle_product(&self, id: &str) -> Result<Product> {
        let api = self.admin()?;
        let id = required_id(id, "Product")?;

        let product = self.settle(api.toggle_product(id).await)?;
        tracing::info!(product_id = %product.id, active = product.is_active, "Toggled product");
        Ok(product)
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category> {
        let api = self.admin()?;
        let draft = prepare_category(draft)?;

        let category = self.settle(api.create_category(&draft).await)?;
        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let api = self.admin()?;
        let id = required_id(id, "Category")?;

        self.settle(api.delete_category(id).await)?;
        tracing::info!(category_id = %id, "Deleted category");
        Ok(())
    }

    /// Ask the backend to create its default categories, then re-read them
    pub async fn seed_categories(&self) -> Result<Vec<Category>> {
        let api = self.admin()?;
        self.settle(api.seed_categories().await)?;
        self.settle(api.list_categories().await)
    }

    /// Fresh settings for editing. Unlike `site_settings`, failures surface
    /// instead of falling back, so an edit never starts from stale values.
    pub async fn admin_settings(&self) -> Result<SiteSettings> {
        let api = self.admin()?;
        let settings = self.settle(api.get_settings().await)?;
        cache_settings(&self.db, &settings);
        Ok(settings)
    }

    pub async fn update_settings(&self, mut settings: SiteSettings) -> Result<SiteSettings> {
        let api = self.admin()?;

        for link in [&mut settings.hero_image, &mut settings.logo_url] {
            if let Some(value) = link.as_mut() {
                *value = self.links.canonicalize(value);
            }
        }

        let saved = self.settle(api.update_settings(&settings).await)?;
        cache_settings(&self.db, &saved);
        tracing::info!("Updated site settings");
        Ok(saved)
    }
}

fn required_id<'a>(id: &'a str, what: &str) -> Result<&'a str> {
    match id.trim() {
        "" => Err(CoreError::Invalid(format!("{} id is required", what))),
        "." | ".." => Err(CoreError::Invalid(format!("'{}' is not a valid {} id", id, what))),
        id => Ok(id),
    }
}

fn cached_settings(db: &Database) -> Option<SiteSettings> {
    let raw = match db.get_setting(SETTINGS_CACHE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cached settings");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable cached settings");
            None
        }
    }
}

fn cache_settings(db: &Database, settings: &SiteSettings) {
    let stored = serde_json::to_string(settings)
        .map_err(CoreError::from)
        .and_then(|json| {
            db.set_setting(SETTINGS_CACHE_KEY, &json)
                .map_err(CoreError::from)
        });
    if let Err(e) = stored {
        tracing::warn!(error = %e, "Failed to cache site settings");
    }
}

/// Settings source that also refreshes the local fallback copy
struct CachingSettings {
    api: ApiClient,
    db: Database,
}

#[async_trait]
impl SettingsSource for CachingSettings {
    async fn fetch_settings(&self) -> std::result::Result<SiteSettings, ApiError> {
        let settings = self.api.fetch_settings().await?;
        cache_settings(&self.db, &settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_session::{AuthorityError, Credential};
    use shopfront_test_utils::TestBackend;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Two fixed accounts; any issued token verifies
    struct StaticAuthority;

    #[async_trait]
    impl Authority for StaticAuthority {
        async fn sign_in(
            &self,
            identifier: &str,
            secret: &str,
        ) -> std::result::Result<(Credential, Profile), AuthorityError> {
            let is_privileged = match (identifier, secret) {
                ("admin@shop.test", "admin-pw") => true,
                ("buyer@shop.test", "buyer-pw") => false,
                _ => {
                    return Err(AuthorityError::Rejected(
                        "Invalid email or password".to_string(),
                    ))
                }
            };
            Ok((
                Credential::new(format!("token-for-{}", identifier)),
                Profile {
                    id: identifier.to_string(),
                    email: identifier.to_string(),
                    is_privileged,
                },
            ))
        }

        async fn verify(
            &self,
            credential: &Credential,
        ) -> std::result::Result<Profile, AuthorityError> {
            let email = credential
                .expose()
                .strip_prefix("token-for-")
                .ok_or_else(|| AuthorityError::Rejected("Invalid token".to_string()))?;
            Ok(Profile {
                id: email.to_string(),
                email: email.to_string(),
                is_privileged: email.starts_with("admin"),
            })
        }
    }

    /// Base URL nothing listens on
    fn dead_backend() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn storefront_at(db: &Database, base: &str, scope: &ScopeId) -> Storefront {
        let mut config = Config::new(PathBuf::from("/unused"));
        config.api_base = base.to_string();
        let api = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        Storefront::from_parts(
            config,
            db.clone(),
            api,
            Arc::new(StaticAuthority),
            scope.clone(),
        )
        .unwrap()
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: None,
            price: 10.0,
            category_id: None,
            image_url: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_reads_degrade_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());

        assert!(store.products(&ProductQuery::default()).await.is_empty());
        assert!(store.product("1").await.is_none());
        assert!(store.categories().await.is_empty());
        assert_eq!(store.site_settings().await, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_settings_fall_back_to_cache() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting(SETTINGS_CACHE_KEY, r#"{"site_name":"Corner Shop"}"#)
            .unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());

        let settings = store.site_settings().await;
        assert_eq!(settings.site_name.as_deref(), Some("Corner Shop"));
    }

    #[tokio::test]
    async fn test_successful_settings_read_is_cached() {
        let backend = TestBackend::start().await;
        backend.respond("GET", "/api/settings", 200, r#"{"site_name":"Live Shop","banner":"sale"}"#);
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, backend.base(), &ScopeId::new());

        let settings = store.site_settings().await;
        assert_eq!(settings.site_name.as_deref(), Some("Live Shop"));
        assert_eq!(store.cached_settings(), Some(settings));
    }

    #[tokio::test]
    async fn test_writes_refused_without_admin() {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());

        let err = store.create_product(draft("Mug")).await.unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));

        store.sign_in("buyer@shop.test", "buyer-pw").await.unwrap();
        let err = store.delete_product("4").await.unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));
        assert!(matches!(
            store.admin_products().await,
            Err(CoreError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_restored_admin_is_forbidden_until_verified() {
        let db = Database::open_in_memory().unwrap();
        let scope = ScopeId::new();
        let base = dead_backend();

        let first = storefront_at(&db, &base, &scope);
        first.sign_in("admin@shop.test", "admin-pw").await.unwrap();

        let reloaded = storefront_at(&db, &base, &scope);
        assert_eq!(reloaded.access(Privilege::Admin), Access::Pending);
        assert!(matches!(
            reloaded.toggle_product("1").await,
            Err(CoreError::Forbidden)
        ));

        assert_eq!(reloaded.initialize().await, GateState::AuthenticatedPrivileged);
        assert_eq!(reloaded.access(Privilege::Admin), Access::Render);
    }

    #[tokio::test]
    async fn test_admin_drafts_checked_before_sending() {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());
        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();

        let err = store.create_product(draft("   ")).await.unwrap_err();
        assert!(matches!(err, CoreError::Invalid(_)));

        let err = store.update_product(" ", draft("Mug")).await.unwrap_err();
        assert!(matches!(err, CoreError::Invalid(_)));

        let err = store
            .create_category(CategoryDraft {
                name: String::new(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_and_keeps_session() {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());
        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();

        let err = store.create_product(draft("Mug")).await.unwrap_err();
        assert!(matches!(err, CoreError::Api(ApiError::Transport(_))));
        assert_eq!(store.gate().state(), GateState::AuthenticatedPrivileged);
    }

    #[tokio::test]
    async fn test_unauthorized_write_expires_session() {
        let backend = TestBackend::start().await;
        backend.respond("PATCH", "/api/products/7/toggle", 401, r#"{"detail":"Token expired"}"#);
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, backend.base(), &ScopeId::new());
        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();

        let err = store.toggle_product("7").await.unwrap_err();
        match err {
            CoreError::Api(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Token expired");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.gate().state(), GateState::Unauthenticated);
        assert_eq!(store.access(Privilege::Admin), Access::Redirect);
    }

    #[tokio::test]
    async fn test_image_helpers() {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, "http://localhost:8000", &ScopeId::new());

        assert_eq!(
            store.image_url(Some("https://drive.google.com/file/d/ABC123xyz/view")),
            "http://localhost:8000/api/images/drive/ABC123xyz"
        );
        assert_eq!(store.image_url(None), shopfront_images::PLACEHOLDER_PATH);
        assert_eq!(
            store.canonical_image_link("https://drive.google.com/open?id=ABC123xyz"),
            "https://lh3.googleusercontent.com/d/ABC123xyz"
        );
    }

    #[tokio::test]
    async fn test_close_purges_tab_session() {
        let db = Database::open_in_memory().unwrap();
        let scope = ScopeId::new();
        let base = dead_backend();

        let store = storefront_at(&db, &base, &scope);
        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();
        store.close().unwrap();

        let reopened = storefront_at(&db, &base, &scope);
        assert!(reopened.gate().credential().is_none());
        assert_eq!(reopened.initialize().await, GateState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_tabs_do_not_share_sessions() {
        let db = Database::open_in_memory().unwrap();
        let base = dead_backend();

        let first = storefront_at(&db, &base, &ScopeId::new());
        first.sign_in("admin@shop.test", "admin-pw").await.unwrap();

        let second = storefront_at(&db, &base, &ScopeId::new());
        assert!(second.gate().credential().is_none());
    }

    async fn signed_in_admin(backend: &TestBackend) -> Storefront {
        let db = Database::open_in_memory().unwrap();
        let store = storefront_at(&db, backend.base(), &ScopeId::new());
        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_update_product_sends_cleaned_draft() {
        let backend = TestBackend::start().await;
        backend.respond(
            "PUT",
            "/api/products/7",
            200,
            r#"{"id":7,"name":"Linen Shirt","price":39.5,"image_url":"https://lh3.googleusercontent.com/d/1AbC_d-9"}"#,
        );
        let store = signed_in_admin(&backend).await;

        let product = store
            .update_product(
                " 7 ",
                ProductDraft {
                    name: "  Linen Shirt ".to_string(),
                    description: Some("  ".to_string()),
                    price: 39.5,
                    category_id: None,
                    image_url: Some(
                        "https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing".to_string(),
                    ),
                    is_active: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(product.id, "7");

        let sent = backend.last_request().unwrap();
        assert_eq!(sent.line(), "PUT /api/products/7");
        assert_eq!(
            sent.header("authorization"),
            Some("Bearer token-for-admin@shop.test")
        );
        assert_eq!(
            sent.json(),
            serde_json::json!({
                "name": "Linen Shirt",
                "price": 39.5,
                "image_url": "https://lh3.googleusercontent.com/d/1AbC_d-9",
                "is_active": true
            })
        );
    }

    #[tokio::test]
    async fn test_category_writes() {
        let backend = TestBackend::start().await;
        backend
            .respond("POST", "/api/categories", 201, r#"{"id":3,"name":"Kitchen"}"#)
            .respond("DELETE", "/api/categories/3", 204, "");
        let store = signed_in_admin(&backend).await;

        let category = store
            .create_category(CategoryDraft {
                name: " Kitchen ".to_string(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(category.id, "3");
        store.delete_category("3").await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].json(), serde_json::json!({"name": "Kitchen"}));
        assert_eq!(
            backend.request_lines(),
            vec!["POST /api/categories", "DELETE /api/categories/3"]
        );
    }

    #[tokio::test]
    async fn test_seed_categories_rereads_list() {
        let backend = TestBackend::start().await;
        backend
            .respond("POST", "/api/categories/seed", 200, r#"{"created":2}"#)
            .respond(
                "GET",
                "/api/categories",
                200,
                r#"[{"id":1,"name":"Apparel"},{"id":2,"name":"Kitchen"}]"#,
            );
        let store = signed_in_admin(&backend).await;

        let categories = store.seed_categories().await.unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apparel", "Kitchen"]);
        assert_eq!(
            backend.request_lines(),
            vec!["POST /api/categories/seed", "GET /api/categories"]
        );
    }

    #[tokio::test]
    async fn test_update_settings_canonicalizes_links_and_caches() {
        let backend = TestBackend::start().await;
        backend.respond(
            "PUT",
            "/api/settings",
            200,
            r#"{"site_name":"Corner Shop","hero_image":"https://lh3.googleusercontent.com/d/HERO1","logo_url":"https://lh3.googleusercontent.com/d/LOGO2"}"#,
        );
        let store = signed_in_admin(&backend).await;

        let saved = store
            .update_settings(SiteSettings {
                site_name: Some("Corner Shop".to_string()),
                hero_image: Some("https://drive.google.com/file/d/HERO1/view".to_string()),
                logo_url: Some("https://drive.google.com/open?id=LOGO2".to_string()),
                ..SiteSettings::default()
            })
            .await
            .unwrap();

        let sent = backend.last_request().unwrap();
        assert_eq!(
            sent.json(),
            serde_json::json!({
                "site_name": "Corner Shop",
                "hero_image": "https://lh3.googleusercontent.com/d/HERO1",
                "logo_url": "https://lh3.googleusercontent.com/d/LOGO2"
            })
        );
        assert_eq!(store.cached_settings(), Some(saved));
    }

    #[tokio::test]
    async fn test_admin_settings_surface_failures() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting(SETTINGS_CACHE_KEY, r#"{"site_name":"Stale"}"#)
            .unwrap();
        let store = storefront_at(&db, &dead_backend(), &ScopeId::new());
        assert!(matches!(
            store.admin_settings().await,
            Err(CoreError::Forbidden)
        ));

        store.sign_in("admin@shop.test", "admin-pw").await.unwrap();
        let err = store.admin_settings().await.unwrap_err();
        assert!(matches!(err, CoreError::Api(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_dot_ids_rejected_before_sending() {
        let backend = TestBackend::start().await;
        let store = signed_in_admin(&backend).await;

        for id in [".", " .. "] {
            let err = store.delete_product(id).await.unwrap_err();
            assert!(matches!(err, CoreError::Invalid(_)));
        }
        assert!(backend.requests().is_empty());
    }
}
