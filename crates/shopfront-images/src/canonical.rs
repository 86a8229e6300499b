//! Storage-time link canonicalization
//!
//! Runs on links pasted into the admin product form before they are saved.
//! Never substitutes a placeholder: if nothing can be derived, the link is
//! stored as typed.

use crate::host::{classify, HostKind};
use crate::patterns::extract_file_id;

/// Direct-file form on the content host. Links stored in this form resolve
/// to themselves at display time.
pub const CONTENT_HOST_PREFIX: &str = "https://lh3.googleusercontent.com/d/";

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCanonicalizer;

impl LinkCanonicalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn canonicalize(&self, link: &str) -> String {
        let trimmed = link.trim();
        if trimmed.is_empty() {
            return link.to_string();
        }

        match classify(trimmed) {
            HostKind::Drive | HostKind::ContentHost => match extract_file_id(trimmed) {
                Some(file) => format!("{}{}", CONTENT_HOST_PREFIX, file.id),
                None => link.to_string(),
            },
            HostKind::Local | HostKind::Other => link.to_string(),
        }
    }
}
