//! Where does a reference point?

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

const DRIVE_HOSTS: &[&str] = &["drive.google.com", "docs.google.com"];
const CONTENT_HOST_DOMAIN: &str = "googleusercontent.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostKind {
    /// Development server on this machine
    Local,
    /// File-storage share links that need an identifier extracted
    Drive,
    /// Direct-file content host; already embeddable
    ContentHost,
    /// Anything else, including strings that are not URLs at all
    Other,
}

pub(crate) fn classify(reference: &str) -> HostKind {
    match parse_lenient(reference) {
        Some(url) => match url.host() {
            Some(host) => classify_host(&host),
            None => HostKind::Other,
        },
        None => HostKind::Other,
    }
}

/// Parse as an absolute URL, assuming `https://` when the scheme was left off
fn parse_lenient(reference: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(reference) {
        return Some(url);
    }

    if reference.contains(' ') {
        return None;
    }

    Url::parse(&format!("https://{}", reference)).ok()
}

fn classify_host(host: &Host<&str>) -> HostKind {
    match host {
        Host::Domain(domain) => {
            let domain = domain.to_ascii_lowercase();
            if domain == "localhost" {
                HostKind::Local
            } else if DRIVE_HOSTS.contains(&domain.as_str()) {
                HostKind::Drive
            } else if domain == CONTENT_HOST_DOMAIN
                || domain.ends_with(&format!(".{}", CONTENT_HOST_DOMAIN))
            {
                HostKind::ContentHost
            } else {
                HostKind::Other
            }
        }
        Host::Ipv4(addr) if addr.is_loopback() || *addr == Ipv4Addr::UNSPECIFIED => {
            HostKind::Local
        }
        Host::Ipv6(addr) if addr.is_loopback() || *addr == Ipv6Addr::UNSPECIFIED => {
            HostKind::Local
        }
        _ => HostKind::Other,
    }
}
