//! Shopfront Image References
//!
//! Product and settings images are pasted in by administrators as links to
//! third-party file storage. Two normalizers share one identifier table:
//!
//! - `ImageResolver` turns any stored reference into something an `<img>`
//!   can load, routing hosted files through the backend image proxy.
//! - `LinkCanonicalizer` turns a pasted link into the form that gets stored.
//!
//! A canonicalized link is a content-host URL, which the resolver passes
//! through untouched.

mod canonical;
mod host;
mod patterns;
mod resolver;

pub use canonical::{LinkCanonicalizer, CONTENT_HOST_PREFIX};
pub use patterns::{extract_file_id, FileId, FileIdPattern, PatternKind, FILE_ID_PATTERNS};
pub use resolver::{ImageResolution, ImageResolver, PLACEHOLDER_PATH};
