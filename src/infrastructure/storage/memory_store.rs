use crate::application::ports::key_value_store::{KeyValueStore, StorageResult};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// プロセス内だけで完結する KeyValueStore
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

fn poisoned<T>(_: T) -> Box<dyn std::error::Error + Send + Sync> {
    "memory store lock poisoned".into()
}

impl KeyValueStore for MemoryKeyValueStore {
    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.contains_key(key))
    }
}
