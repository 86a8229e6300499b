//! Database connection and operations

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL lets several tabs share the file
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(())
        })?;

        Ok(())
    }

    /// Remove every scope whose most recent write is older than `max_idle`.
    ///
    /// Tabs that crash or are killed never run their close path; this sweep
    /// keeps their credentials from lingering on disk. Returns the number of
    /// scopes removed.
    pub fn sweep_idle_scopes(&self, max_idle: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - max_idle).to_rfc3339();

        let removed = self.transaction(|conn| {
            let stale: Vec<String> = {
                let mut stmt = conn.prepare(
                    "SELECT scope_id FROM session_entries
                     GROUP BY scope_id
                     HAVING MAX(updated_at) < ?1",
                )?;
                let rows = stmt
                    .query_map([&cutoff], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                rows
            };

            for scope_id in &stale {
                conn.execute(
                    "DELETE FROM session_entries WHERE scope_id = ?1",
                    [scope_id],
                )?;
            }

            Ok(stale.len())
        })?;

        if removed > 0 {
            tracing::info!(removed, "Swept idle session scopes");
        }

        Ok(removed)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM session_entries", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_settings_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("site_settings").unwrap(), None);

        db.set_setting("site_settings", "{}").unwrap();
        db.set_setting("site_settings", r#"{"site_name":"Shop"}"#).unwrap();

        assert_eq!(
            db.get_setting("site_settings").unwrap().as_deref(),
            Some(r#"{"site_name":"Shop"}"#)
        );
    }

    #[test]
    fn test_sweep_idle_scopes() {
        let db = Database::open_in_memory().unwrap();
        let old = (Utc::now() - Duration::days(3)).to_rfc3339();
        let fresh = Utc::now().to_rfc3339();

        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO session_entries (scope_id, key, value, updated_at)
                 VALUES ('old', 'credential', '\"t\"', ?1)",
                [&old],
            )?;
            conn.execute(
                "INSERT INTO session_entries (scope_id, key, value, updated_at)
                 VALUES ('fresh', 'credential', '\"t\"', ?1)",
                [&fresh],
            )?;
            Ok(())
        })
        .unwrap();

        let removed = db.sweep_idle_scopes(Duration::hours(12)).unwrap();
        assert_eq!(removed, 1);

        let remaining: Vec<String> = db
            .with_connection(|conn| {
                let mut stmt = conn.prepare("SELECT scope_id FROM session_entries")?;
                let rows = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(rows)
            })
            .unwrap();
        assert_eq!(remaining, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_sweep_reports_unreadable_scope_ids() {
        let db = Database::open_in_memory().unwrap();
        let old = (Utc::now() - Duration::days(3)).to_rfc3339();

        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO session_entries (scope_id, key, value, updated_at)
                 VALUES (X'FF00', 'credential', '\"t\"', ?1)",
                [&old],
            )?;
            Ok(())
        })
        .unwrap();

        let err = db.sweep_idle_scopes(Duration::hours(12)).unwrap_err();
        assert!(matches!(err, StorageError::Sqlite(_)), "{:?}", err);

        let count: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM session_entries", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
