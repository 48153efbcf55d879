use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::storage::locks::KeyLocks;
use crate::storage::traits::KeyValueStore;

/// In-process key-value store, for hosts without a writable data directory
/// and for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    values: Arc<RwLock<HashMap<String, String>>>,
    locks: KeyLocks,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks.lock_for(key)
    }
}
