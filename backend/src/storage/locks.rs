use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry of one async mutex per storage key, shared by every clone
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    locks: Arc<std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `key`; the same one for every caller asking for `key`
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        // The map only ever gains entries, so a poisoned guard is still consistent
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
