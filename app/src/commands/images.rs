//! Image reference commands
use serde::Serialize;
use shopfront_core::{ImageResolution, Storefront, PLACEHOLDER_PATH};

use super::print_json;

#[derive(Debug, Serialize)]
pub struct ResolutionInfo {
    pub kind: &'static str,
    pub url: String,
    pub file_id: Option<String>,
}

impl From<ImageResolution> for ResolutionInfo {
    fn from(resolution: ImageResolution) -> Self {
        match resolution {
            ImageResolution::Placeholder => Self {
                kind: "placeholder",
                url: PLACEHOLDER_PATH.to_string(),
                file_id: None,
            },
            ImageResolution::Passthrough(url) => Self {
                kind: "passthrough",
                url,
                file_id: None,
            },
            ImageResolution::Drive { id, url } => Self {
                kind: "drive",
                url,
                file_id: Some(id),
            },
            ImageResolution::Proxy(url) => Self {
                kind: "proxy",
                url,
                file_id: None,
            },
        }
    }
}

pub fn resolve(store: &Storefront, reference: Option<&str>, explain: bool) -> anyhow::Result<()> {
    if explain {
        print_json(&ResolutionInfo::from(store.image_resolution(reference)))
    } else {
        println!("{}", store.image_url(reference));
        Ok(())
    }
}

pub fn canonical(store: &Storefront, link: &str) {
    println!("{}", store.canonical_image_link(link));
}
