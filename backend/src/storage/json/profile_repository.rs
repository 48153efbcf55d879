//! # JSON Profile Repository
//!
//! Keeps every cat profile in one JSON array stored under
//! [`PROFILES_STORAGE_KEY`] of a [`KeyValueStore`].
//!
//! ```json
//! [
//!   {"id":"1702516122000","name":"Mochi","weight":4.2,"catStatus":"neutered",
//!    "foodType":"both","wetFoodCalories":80,"dryFoodCaloriesPerKg":3500,
//!    "treatCalories":0,"pouches":1,"savedAt":1702516122000}
//! ]
//! ```
//!
//! All operations are read-modify-write over the whole array. They run one at
//! a time behind the store's lock for the profiles key, so a save racing
//! another save cannot drop either profile, even when the two go through
//! different repositories over the same data. Nothing else may write the
//! profiles key directly.

use async_trait::async_trait;
use log::{debug, info, warn};
use shared::CatProfile;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::error::ProfileStoreError;
use crate::storage::traits::{KeyValueStore, NewProfile, ProfileStorage, PROFILES_STORAGE_KEY};

#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn profiles_lock(&self) -> Arc<Mutex<()>> {
        self.store.lock_for(PROFILES_STORAGE_KEY)
    }

    /// Load the collection; an unset key is an empty collection
    async fn read_all(&self) -> Result<Vec<CatProfile>, ProfileStoreError> {
        let raw = self
            .store
            .get(PROFILES_STORAGE_KEY)
            .await
            .map_err(|source| ProfileStoreError::Read {
                key: PROFILES_STORAGE_KEY.to_string(),
                source,
            })?;

        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!("No stored profiles yet");
                return Ok(Vec::new());
            }
        };

        serde_json::from_str(&raw).map_err(|source| {
            warn!("Stored profiles could not be decoded: {}", source);
            ProfileStoreError::Corrupt {
                key: PROFILES_STORAGE_KEY.to_string(),
                source,
            }
        })
    }

    async fn write_all(&self, profiles: &[CatProfile]) -> Result<(), ProfileStoreError> {
        let raw = serde_json::to_string(profiles)
            .map_err(|source| ProfileStoreError::Encode { source })?;

        self.store
            .set(PROFILES_STORAGE_KEY, &raw)
            .await
            .map_err(|source| ProfileStoreError::Write {
                key: PROFILES_STORAGE_KEY.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn save_profile(&self, profile: &CatProfile) -> Result<(), ProfileStoreError> {
        let lock = self.profiles_lock();
        let _guard = lock.lock().await;

        let mut profiles = self.read_all().await?;
        profiles.push(profile.clone());
        self.write_all(&profiles).await?;

        info!("Saved profile {} ({} stored)", profile.id, profiles.len());
        Ok(())
    }

    async fn create_profile(&self, build: NewProfile) -> Result<CatProfile, ProfileStoreError> {
        let lock = self.profiles_lock();
        let _guard = lock.lock().await;

        let mut profiles = self.read_all().await?;
        let profile = build(&profiles);
        profiles.push(profile.clone());
        self.write_all(&profiles).await?;

        info!("Created profile {} ({} stored)", profile.id, profiles.len());
        Ok(profile)
    }

    async fn list_profiles(&self) -> Result<Vec<CatProfile>, ProfileStoreError> {
        let lock = self.profiles_lock();
        let _guard = lock.lock().await;

        let profiles = self.read_all().await?;
        debug!("Loaded {} profiles", profiles.len());
        Ok(profiles)
    }

    async fn update_profile(&self, id: &str, profile: &CatProfile) -> Result<bool, ProfileStoreError> {
        let lock = self.profiles_lock();
        let _guard = lock.lock().await;

        let mut profiles = self.read_all().await?;
        let mut replaced = false;
        for existing in profiles.iter_mut().filter(|p| p.id == id) {
            *existing = profile.clone();
            replaced = true;
        }

        self.write_all(&profiles).await?;

        if replaced {
            info!("Updated profile {}", id);
        } else {
            warn!("Update for unknown profile {}, collection left unchanged", id);
        }
        Ok(replaced)
    }

    async fn delete_profile(&self, id: &str) -> Result<bool, ProfileStoreError> {
        let lock = self.profiles_lock();
        let _guard = lock.lock().await;

        let mut profiles = self.read_all().await?;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        let removed = before - profiles.len();

        self.write_all(&profiles).await?;

        if removed > 0 {
            info!("Deleted profile {}", id);
        } else {
            warn!("Delete for unknown profile {}, nothing removed", id);
        }
        Ok(removed > 0)
    }
}
