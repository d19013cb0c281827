//! Key-value port the builder persists its draft through

use std::collections::HashMap;

use anyhow::Result;
use tracing::info;

/// Durable key-value storage for serialised drafts
pub trait DraftStore {
    /// Read the bytes stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

impl<S: DraftStore + ?Sized> DraftStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }
}

/// Draft store held in memory only; contents are lost when dropped
#[derive(Debug, Default, Clone)]
pub struct InMemoryDraftStore {
    entries: HashMap<String, Vec<u8>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        info!("Keeping transaction drafts in memory");
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_replaces_values() {
        let mut store = InMemoryDraftStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", b"one").unwrap();
        store.put("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn DraftStore> = Box::new(InMemoryDraftStore::new());
        store.put("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }
}
