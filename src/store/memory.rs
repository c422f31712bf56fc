//! In-memory store used as a test double for the composed operations.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;
use crate::store::Store;

/// HashMap-backed [`Store`] for exercising the contract without a
/// server. Expiry is ignored, matching what the composed operations
/// can observe within a single test.
#[derive(Default)]
pub(crate) struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn has(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    async fn put(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn add(&self, key: &str, value: &str, _ttl: Duration) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), value.to_string());
        true
    }

    async fn forget(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key);
        true
    }

    async fn flush(&self) -> bool {
        self.entries.lock().unwrap().clear();
        true
    }
}
