/// Failures surfaced by the profile store.
///
/// I/O failures of the underlying key-value store and undecodable stored data
/// are kept apart so callers can tell "try again" from "data is damaged".
#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("Failed to read profiles from storage key '{key}'")]
    Read {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to write profiles to storage key '{key}'")]
    Write {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Stored profiles under key '{key}' are not valid JSON")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode profiles")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl ProfileStoreError {
    /// True for failures of the underlying storage I/O
    pub fn is_io(&self) -> bool {
        matches!(self, ProfileStoreError::Read { .. } | ProfileStoreError::Write { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, ProfileStoreError::Corrupt { .. })
    }
}
