//! Test utilities for the JSON storage backend
//!
//! `TestEnvironment` owns a temporary directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Mutex;

use super::connection::JsonConnection;
use super::memory::MemoryConnection;
use super::profile_repository::ProfileRepository;
use crate::storage::traits::KeyValueStore;
use shared::{CatProfile, CatStatus, FoodType};

/// RAII test environment around a temporary data directory
pub struct TestEnvironment {
    /// Kept alive until drop
    _temp_dir: TempDir,
    pub connection: JsonConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = JsonConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Profile repository backed by this environment's directory
    pub fn profile_repository(&self) -> ProfileRepository {
        ProfileRepository::new(Arc::new(self.connection.clone()))
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("CATCULATOR_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Key-value store whose reads and/or writes can be switched to fail
#[derive(Debug, Clone, Default)]
pub struct FailingConnection {
    inner: MemoryConnection,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FailingConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated read failure for {}", key);
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("simulated write failure for {}", key);
        }
        self.inner.set(key, value).await
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.inner.lock_for(key)
    }
}

/// Key-value store that sleeps between the start of a read and its result,
/// so unsynchronized read-modify-write cycles interleave
#[derive(Debug, Clone, Default)]
pub struct SlowConnection {
    inner: MemoryConnection,
}

impl SlowConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for SlowConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.inner.get(key).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        value
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.inner.lock_for(key)
    }
}

/// A profile with typical values
pub fn sample_profile(id: &str, name: &str, saved_at: i64) -> CatProfile {
    CatProfile {
        id: id.to_string(),
        name: name.to_string(),
        weight: 4.2,
        cat_status: CatStatus::Neutered,
        food_type: FoodType::Both,
        wet_food_calories: 80.0,
        dry_food_calories_per_kg: 3500.0,
        treat_calories: 0.0,
        pouches: Some(1),
        saved_at,
    }
}
