use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::storage::locks::KeyLocks;
use crate::storage::traits::KeyValueStore;

/// Directory name used under the platform data directory
const DEFAULT_DIRECTORY_NAME: &str = "Catculator";

/// Locks keyed by data file path, shared by every connection in the process
static FILE_LOCKS: Lazy<KeyLocks> = Lazy::new(KeyLocks::new);

/// JsonConnection keeps one JSON file per storage key inside a base directory
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
    /// Canonical form of `base_directory`, so two spellings of one directory share locks
    lock_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        let lock_directory = std::fs::canonicalize(&base_path).unwrap_or_else(|_| base_path.clone());

        Ok(Self {
            base_directory: base_path,
            lock_directory,
        })
    }

    /// Create a connection in the platform data directory
    /// (e.g. ~/.local/share/Catculator), or ./catculator-data if there is none
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_directory())
    }

    pub fn default_directory() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join(DEFAULT_DIRECTORY_NAME),
            None => PathBuf::from("catculator-data"),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File name for a storage key
    /// "@catculator/profiles" -> "catculator_profiles.json"
    pub fn file_name_for_key(key: &str) -> String {
        let stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        let stem = stem.trim_matches('_');

        if stem.is_empty() {
            "_.json".to_string()
        } else {
            format!("{}.json", stem)
        }
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.base_directory.join(Self::file_name_for_key(key))
    }
}

#[async_trait]
impl KeyValueStore for JsonConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key);

        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Read {} bytes for key {} from {}", content.len(), key, path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No file for key {}, treating as unset", key);
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key);

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)
            .await
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .await
            .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;

        debug!("Wrote {} bytes for key {} to {}", value.len(), key, path.display());
        Ok(())
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let path = self.lock_directory.join(Self::file_name_for_key(key));
        FILE_LOCKS.lock_for(&path.to_string_lossy())
    }
}
