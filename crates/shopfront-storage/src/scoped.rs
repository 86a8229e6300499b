//! Tab-scoped session storage
//!
//! Each browsing tab (or CLI session) owns a `ScopeId`. Entries written under
//! a scope are visible to any later handle opened on the same scope, which is
//! what lets a reload pick up where it left off. `close` drops the whole
//! scope; nothing written here is meant to outlive the tab.

use chrono::Utc;
use rusqlite::OptionalExtension;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::Database;
use crate::error::StorageError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(String);

impl ScopeId {
    /// Fresh scope for a newly opened tab
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ScopeId {
    type Err = StorageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if s.is_empty() || s.len() > 64 || !valid_chars {
            return Err(StorageError::InvalidScope(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

pub struct SessionStorage {
    db: Database,
    scope: ScopeId,
}

impl SessionStorage {
    pub fn new(db: Database, scope: ScopeId) -> Self {
        Self { db, scope }
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    /// Read and decode a value stored under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self.db.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM session_entries WHERE scope_id = ?1 AND key = ?2",
                    rusqlite::params![self.scope.as_str(), key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let updated_at = Utc::now().to_rfc3339();

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO session_entries (scope_id, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![self.scope.as_str(), key, json, updated_at],
            )?;
            Ok(())
        })
    }

    /// Write several entries atomically
    pub fn set_many(&self, entries: &[(&str, serde_json::Value)]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        self.db.transaction(|conn| {
            for (key, value) in entries {
                conn.execute(
                    "INSERT OR REPLACE INTO session_entries (scope_id, key, value, updated_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![
                        self.scope.as_str(),
                        key,
                        serde_json::to_string(value)?,
                        updated_at
                    ],
                )?;
            }
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "DELETE FROM session_entries WHERE scope_id = ?1 AND key = ?2",
                rusqlite::params![self.scope.as_str(), key],
            )?;
            Ok(())
        })
    }

    /// Remove every entry in this scope
    pub fn clear(&self) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "DELETE FROM session_entries WHERE scope_id = ?1",
                [self.scope.as_str()],
            )?;
            Ok(())
        })
    }

    /// Tab close. Same effect as `clear`, logged as teardown.
    pub fn close(&self) -> Result<()> {
        self.clear()?;
        tracing::debug!(scope = %self.scope, "Closed session scope");
        Ok(())
    }
}

impl Clone for SessionStorage {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            scope: self.scope.clone(),
        }
    }
}
