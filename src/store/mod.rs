//! Key-value persistence port for the field client.
//!
//! Case records, per-key counters, the logged-in officer, and the SOP
//! registries all live behind this trait. Implementations are injected,
//! never reached through ambient globals.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryFieldStore;
pub use sqlite::SqliteFieldStore;

use serde_json::Value;
use thiserror::Error;

/// Store namespaces. Keys are unique within a namespace.
pub mod ns {
    /// Case records, keyed by case id.
    pub const CASES: &str = "cases";
    /// Per-`REGION-DISTRICT-YYYYMMDD` sequence counters.
    pub const COUNTERS: &str = "counters";
    /// Currently logged-in officer record.
    pub const SESSION: &str = "session";
    /// SOP document registry, keyed by document id.
    pub const SOPS: &str = "sops";
    /// Deleted SOPs waiting out the retention window.
    pub const SOP_TRASH: &str = "sop_trash";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("corrupt value under {namespace}/{key}: {reason}")]
    Corrupt {
        namespace: String,
        key: String,
        reason: String,
    },
}

/// Durable key-value storage for the field client.
pub trait FieldStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, StoreError>;
    fn put(&mut self, namespace: &str, key: &str, value: &Value) -> Result<(), StoreError>;
    fn remove(&mut self, namespace: &str, key: &str) -> Result<(), StoreError>;
    fn keys(&self, namespace: &str) -> Result<Vec<String>, StoreError>;
}

/// Read-increment-persist the counter stored under `key`.
///
/// The first call for a key yields 1. Counters only ever grow for the
/// lifetime of the store; nothing resets them.
pub fn next_count<S: FieldStore + ?Sized>(store: &mut S, key: &str) -> Result<u32, StoreError> {
    let prev = store
        .get(ns::COUNTERS, key)?
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or(0);
    let next = u32::try_from(prev).unwrap_or(u32::MAX).saturating_add(1);
    store.put(ns::COUNTERS, key, &Value::from(next))?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_one_and_increments() {
        let mut store = MemoryFieldStore::new();
        assert_eq!(next_count(&mut store, "ASH-OBU-20250110").unwrap(), 1);
        assert_eq!(next_count(&mut store, "ASH-OBU-20250110").unwrap(), 2);
        // independent composite keys do not share sequences
        assert_eq!(next_count(&mut store, "GAR-ACC-20250110").unwrap(), 1);
    }

    #[test]
    fn counter_accepts_legacy_string_values() {
        let mut store = MemoryFieldStore::new();
        store
            .put(ns::COUNTERS, "ASH-OBU-20250110", &Value::from("7"))
            .unwrap();
        assert_eq!(next_count(&mut store, "ASH-OBU-20250110").unwrap(), 8);
    }
}
