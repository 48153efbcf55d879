//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. `KeyValueStore` is the raw
//! string-by-key persistence the app runs on; `ProfileStorage` is the profile
//! collection kept under a single key of that store.

use anyhow::Result;
use async_trait::async_trait;
use shared::CatProfile;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::ProfileStoreError;

/// Fixed key the profile collection lives under
pub const PROFILES_STORAGE_KEY: &str = "@catculator/profiles";

/// Asynchronous string key-value persistence
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing whatever was there
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Exclusive lock for read-modify-write cycles on `key`.
    ///
    /// Every handle onto the same underlying data must return the same mutex
    /// for the same key.
    fn lock_for(&self, key: &str) -> Arc<Mutex<()>>;
}

/// Builds the profile to append from the collection as currently stored
pub type NewProfile = Box<dyn FnOnce(&[CatProfile]) -> CatProfile + Send>;

/// Trait defining the interface for cat profile storage operations
///
/// Every operation reads the whole collection, modifies it and writes it back.
/// Implementations must serialize these cycles so concurrent callers never
/// lose each other's writes.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Append a profile. Does not check the ID for uniqueness.
    async fn save_profile(&self, profile: &CatProfile) -> Result<(), ProfileStoreError>;

    /// Append the profile `build` makes from the stored collection, as one
    /// step. Returns the appended profile.
    async fn create_profile(&self, build: NewProfile) -> Result<CatProfile, ProfileStoreError>;

    /// All stored profiles in storage order; empty if nothing is stored
    async fn list_profiles(&self) -> Result<Vec<CatProfile>, ProfileStoreError>;

    /// Replace the profile with ID `id` by `profile`.
    /// Returns false (and writes the collection back unchanged) when no profile matched.
    async fn update_profile(&self, id: &str, profile: &CatProfile) -> Result<bool, ProfileStoreError>;

    /// Remove every profile with ID `id`.
    /// Returns false when nothing was removed.
    async fn delete_profile(&self, id: &str) -> Result<bool, ProfileStoreError>;
}
