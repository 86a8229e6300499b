//! Display-time image resolution
//!
//! Rules, evaluated in order:
//! 1. Missing or blank → local placeholder
//! 2. `data:` payloads and local paths → as-is
//! 3. Local development hosts → as-is
//! 4. Hosts other than the known file stores → as-is
//! 5. Content-host direct files → as-is
//! 6. Identifier found → `<api>/api/images/drive/<id>`
//! 7. Otherwise → `<api>/api/images/proxy?url=<encoded>`

use url::form_urlencoded;

use crate::host::{classify, HostKind};
use crate::patterns::extract_file_id;

pub const PLACEHOLDER_PATH: &str = "/placeholder.jpg";

/// Outcome of resolving one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResolution {
    /// Nothing to show
    Placeholder,
    /// Already directly loadable
    Passthrough(String),
    /// Hosted file served through the backend by identifier
    Drive { id: String, url: String },
    /// Hosted link with no recognizable identifier, fetched by the backend proxy
    Proxy(String),
}

impl ImageResolution {
    pub fn url(&self) -> &str {
        match self {
            ImageResolution::Placeholder => PLACEHOLDER_PATH,
            ImageResolution::Passthrough(url) => url,
            ImageResolution::Drive { url, .. } => url,
            ImageResolution::Proxy(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            ImageResolution::Placeholder => PLACEHOLDER_PATH.to_string(),
            ImageResolution::Passthrough(url) => url,
            ImageResolution::Drive { url, .. } => url,
            ImageResolution::Proxy(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    /// API base without a trailing slash
    api_base: String,
}

impl ImageResolver {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Resolve a reference to a URL an image element can load
    pub fn resolve(&self, reference: Option<&str>) -> String {
        self.resolve_detailed(reference).into_url()
    }

    pub fn resolve_detailed(&self, reference: Option<&str>) -> ImageResolution {
        let raw = match reference {
            Some(r) if !r.trim().is_empty() => r,
            _ => return ImageResolution::Placeholder,
        };
        let trimmed = raw.trim();

        if trimmed.starts_with("data:") || trimmed.starts_with('/') {
            return ImageResolution::Passthrough(raw.to_string());
        }

        match classify(trimmed) {
            HostKind::Local | HostKind::Other | HostKind::ContentHost => {
                ImageResolution::Passthrough(raw.to_string())
            }
            HostKind::Drive => match extract_file_id(trimmed) {
                Some(file) => ImageResolution::Drive {
                    url: self.drive_url(&file.id),
                    id: file.id,
                },
                None => {
                    tracing::debug!(reference = %trimmed, "No file id found, using image proxy");
                    ImageResolution::Proxy(self.proxy_url(trimmed))
                }
            },
        }
    }

    pub fn drive_url(&self, id: &str) -> String {
        format!("{}/api/images/drive/{}", self.api_base, id)
    }

    pub fn proxy_url(&self, original: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(original.as_bytes()).collect();
        format!("{}/api/images/proxy?url={}", self.api_base, encoded)
    }
}
