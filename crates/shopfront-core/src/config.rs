//! Storefront configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

pub const API_BASE_ENV: &str = "SHOPFRONT_API_BASE";
pub const DISPLAY_NAME_ENV: &str = "SHOPFRONT_DISPLAY_NAME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin, e.g. `http://localhost:8000`
    pub api_base: String,
    /// Store name shown in headers
    pub display_name: String,
    /// Path to the database file
    pub database_path: PathBuf,
    pub settings_poll_secs: u64,
    pub request_timeout_secs: u64,
    /// Scopes untouched this long are treated as abandoned tabs
    pub scope_idle_ttl_hours: i64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            display_name: "Shopfront".to_string(),
            database_path: data_dir.join("shopfront.db"),
            settings_poll_secs: 30,
            request_timeout_secs: 15,
            scope_idle_ttl_hours: 12,
        }
    }

    /// Defaults overridden by `SHOPFRONT_API_BASE` / `SHOPFRONT_DISPLAY_NAME`
    pub fn from_env() -> Self {
        Self::default().with_vars(|key| std::env::var(key).ok())
    }

    pub fn with_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        if let Some(name) = lookup(DISPLAY_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            self.display_name = name.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base)
            .map_err(|e| CoreError::Config(format!("{} is not a valid URL: {}", API_BASE_ENV, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CoreError::Config(format!(
                "{} must be http or https, got {}",
                API_BASE_ENV,
                url.scheme()
            )));
        }
        if self.settings_poll_secs == 0 {
            return Err(CoreError::Config(
                "settings poll interval must be positive".to_string(),
            ));
        }
        if self.scope_idle_ttl_hours <= 0 {
            return Err(CoreError::Config(
                "scope idle TTL must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn settings_poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings_poll_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn scope_idle_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.scope_idle_ttl_hours)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Shopfront"))
            .unwrap_or_else(|| PathBuf::from(".shopfront"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new(PathBuf::from("/tmp/shopfront"));
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.database_path, PathBuf::from("/tmp/shopfront/shopfront.db"));
        config.validate().unwrap();
    }

    #[test]
    fn test_vars_override() {
        let config = Config::new(PathBuf::from("/tmp")).with_vars(|key| match key {
            API_BASE_ENV => Some(" https://api.shop.example ".to_string()),
            DISPLAY_NAME_ENV => Some("Corner Shop".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base, "https://api.shop.example");
        assert_eq!(config.display_name, "Corner Shop");
    }

    #[test]
    fn test_blank_vars_ignored() {
        let config =
            Config::new(PathBuf::from("/tmp")).with_vars(|_| Some("   ".to_string()));
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.display_name, "Shopfront");
    }

    #[test]
    fn test_validate_rejects_bad_base() {
        let mut config = Config::new(PathBuf::from("/tmp"));
        config.api_base = "localhost".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.api_base = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
