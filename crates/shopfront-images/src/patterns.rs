//! File identifier extraction
//!
//! Order matters: the first pattern that matches wins and later ones are
//! never consulted.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `googleusercontent.com/d/<id>`
    ContentHostDirect,
    /// `drive.google.com/open?id=<id>`
    OpenById,
    /// any `?id=<id>` / `&id=<id>`
    IdQuery,
    /// any `/d/<id>` path segment, e.g. `/file/d/<id>/view`
    PathSegment,
}

#[derive(Debug, Clone, Copy)]
pub struct FileIdPattern {
    pub kind: PatternKind,
    pub expr: &'static str,
}

pub const FILE_ID_PATTERNS: &[FileIdPattern] = &[
    FileIdPattern {
        kind: PatternKind::ContentHostDirect,
        expr: r"googleusercontent\.com/d/([A-Za-z0-9_-]+)",
    },
    FileIdPattern {
        kind: PatternKind::OpenById,
        expr: r"drive\.google\.com/open\?id=([A-Za-z0-9_-]+)",
    },
    FileIdPattern {
        kind: PatternKind::IdQuery,
        expr: r"[?&]id=([A-Za-z0-9_-]+)",
    },
    FileIdPattern {
        kind: PatternKind::PathSegment,
        expr: r"/d/([A-Za-z0-9_-]+)",
    },
];

static COMPILED: Lazy<Vec<(PatternKind, Regex)>> = Lazy::new(|| {
    FILE_ID_PATTERNS
        .iter()
        .map(|p| {
            let regex = Regex::new(p.expr).expect("file id patterns are valid regexes");
            (p.kind, regex)
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileId {
    pub kind: PatternKind,
    pub id: String,
}

/// Extract the opaque storage identifier from a link, if any pattern matches
pub fn extract_file_id(link: &str) -> Option<FileId> {
    COMPILED.iter().find_map(|(kind, regex)| {
        regex
            .captures(link)
            .and_then(|caps| caps.get(1))
            .map(|m| FileId {
                kind: *kind,
                id: m.as_str().to_string(),
            })
    })
}
