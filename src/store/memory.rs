use std::collections::BTreeMap;

use serde_json::Value;

use super::{FieldStore, StoreError};

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    entries: BTreeMap<(String, String), Value>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldStore for MemoryFieldStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn put(&mut self, namespace: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries
            .insert((namespace.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<(), StoreError> {
        self.entries
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, key)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove() {
        let mut store = MemoryFieldStore::new();
        store.put("cases", "a", &Value::from(1)).unwrap();
        assert_eq!(store.get("cases", "a").unwrap(), Some(Value::from(1)));
        store.remove("cases", "a").unwrap();
        assert_eq!(store.get("cases", "a").unwrap(), None);
    }

    #[test]
    fn keys_scoped_to_namespace() {
        let mut store = MemoryFieldStore::new();
        store.put("cases", "a", &Value::Null).unwrap();
        store.put("sops", "b", &Value::Null).unwrap();
        assert_eq!(store.keys("cases").unwrap(), vec!["a".to_string()]);
    }
}
