//! SQLite-backed key-value state store.
//!
//! This is the single source of truth shared by the UI-facing process and the
//! interval-monitor process. Every externally-triggered operation re-reads
//! from here; in-memory copies are never trusted across call sites.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::StorageError;
use crate::sabbath::SabbathState;
use crate::schedule::WeeklyRecurrence;
use crate::selection::Selection;

/// Logical key names. Fixed strings shared across processes.
pub mod keys {
    pub const STATE: &str = "sabbath_state";
    pub const RECURRENCE: &str = "sabbath_recurrence";
    pub const ACTIVATED_AT: &str = "sabbath_activated_at";
    pub const AUTO_MODE: &str = "sabbath_auto_mode";
    pub const SELECTION: &str = "saved_selection";
    pub const PREMIUM: &str = "is_premium_user";
    pub const ENFORCEMENT: &str = "enforcement_settings";
    pub const REGISTRATIONS: &str = "monitor_registrations";
}

/// Key-value store at `~/.config/sabbathlock/sabbathlock.db`.
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Open the store, creating the file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("sabbathlock.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    // ── Raw access ───────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::CorruptValue {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::CorruptValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    // ── Typed accessors ──────────────────────────────────────────────

    /// Stored enforcement state. Records only the active/inactive fact;
    /// the user-visible state is derived in `SabbathManager::current_state`.
    pub fn state(&self) -> Result<SabbathState, StorageError> {
        match self.kv_get(keys::STATE)? {
            Some(raw) => SabbathState::from_raw(&raw).ok_or(StorageError::CorruptValue {
                key: keys::STATE.to_string(),
                message: format!("unknown state '{raw}'"),
            }),
            None => Ok(SabbathState::Inactive),
        }
    }

    pub fn set_state(&self, state: SabbathState) -> Result<(), StorageError> {
        self.kv_set(keys::STATE, state.raw())
    }

    pub fn recurrence(&self) -> Result<WeeklyRecurrence, StorageError> {
        Ok(self.get_json(keys::RECURRENCE)?.unwrap_or_default())
    }

    pub fn set_recurrence(&self, recurrence: &WeeklyRecurrence) -> Result<(), StorageError> {
        self.set_json(keys::RECURRENCE, recurrence)
    }

    pub fn activated_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.get_json(keys::ACTIVATED_AT)
    }

    pub fn set_activated_at(&self, at: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        match at {
            Some(at) => self.set_json(keys::ACTIVATED_AT, &at),
            None => self.kv_delete(keys::ACTIVATED_AT),
        }
    }

    pub fn auto_mode_enabled(&self) -> Result<bool, StorageError> {
        Ok(self.get_json(keys::AUTO_MODE)?.unwrap_or(false))
    }

    pub fn set_auto_mode_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.set_json(keys::AUTO_MODE, &enabled)
    }

    pub fn selection(&self) -> Result<Selection, StorageError> {
        Ok(self.get_json(keys::SELECTION)?.unwrap_or_default())
    }

    pub fn set_selection(&self, selection: &Selection) -> Result<(), StorageError> {
        self.set_json(keys::SELECTION, selection)
    }

    /// Cached entitlement flag, written by the storefront collaborator.
    pub fn is_premium(&self) -> Result<bool, StorageError> {
        Ok(self.get_json(keys::PREMIUM)?.unwrap_or(false))
    }

    pub fn set_premium(&self, premium: bool) -> Result<(), StorageError> {
        self.set_json(keys::PREMIUM, &premium)
    }

    /// Drop every stored key, returning all state to defaults.
    pub fn reset(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Weekday;

    #[test]
    fn kv_round_trip() {
        let store = StateStore::open_memory().unwrap();
        assert!(store.kv_get("missing").unwrap().is_none());
        store.kv_set("k", "v1").unwrap();
        store.kv_set("k", "v2").unwrap();
        assert_eq!(store.kv_get("k").unwrap().unwrap(), "v2");
        store.kv_delete("k").unwrap();
        assert!(store.kv_get("k").unwrap().is_none());
    }

    #[test]
    fn defaults_when_absent() {
        let store = StateStore::open_memory().unwrap();
        assert_eq!(store.state().unwrap(), SabbathState::Inactive);
        assert_eq!(store.recurrence().unwrap(), WeeklyRecurrence::default());
        assert!(store.activated_at().unwrap().is_none());
        assert!(!store.auto_mode_enabled().unwrap());
        assert!(store.selection().unwrap().is_empty());
        assert!(!store.is_premium().unwrap());
    }

    #[test]
    fn recurrence_round_trip() {
        let store = StateStore::open_memory().unwrap();
        let r = WeeklyRecurrence {
            start_day: Weekday::Saturday,
            start_hour: 23,
            start_minute: 0,
            end_day: Weekday::Sunday,
            end_hour: 1,
            end_minute: 0,
        };
        store.set_recurrence(&r).unwrap();
        assert_eq!(store.recurrence().unwrap(), r);
    }

    #[test]
    fn corrupt_state_is_reported() {
        let store = StateStore::open_memory().unwrap();
        store.kv_set(keys::STATE, "bogus").unwrap();
        assert!(matches!(
            store.state(),
            Err(StorageError::CorruptValue { .. })
        ));
    }

    #[test]
    fn reset_clears_everything() {
        let store = StateStore::open_memory().unwrap();
        store.set_state(SabbathState::Active).unwrap();
        store.set_auto_mode_enabled(true).unwrap();
        store.set_premium(true).unwrap();
        store.reset().unwrap();
        assert_eq!(store.state().unwrap(), SabbathState::Inactive);
        assert!(!store.auto_mode_enabled().unwrap());
        assert!(!store.is_premium().unwrap());
    }
}
