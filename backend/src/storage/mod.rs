//! # Storage Module
//!
//! Handles all data persistence for the calculator.
//!
//! The domain layer only sees the [`ProfileStorage`] trait. The profile
//! repository in turn only sees a [`KeyValueStore`], so the app can run on a
//! data directory, an in-memory store, or any other string-by-key backend the
//! host provides.
//!
//! ## Key Responsibilities
//!
//! - **Profile persistence**: the saved cat profiles as one JSON array
//! - **Serialized read-modify-write**: one lock per storage key, so no lost
//!   updates between concurrent callers, even across repository instances
//! - **Error reporting**: I/O and corrupt data surface as distinct errors

pub mod error;
pub mod json;
pub mod locks;
pub mod traits;

pub use error::ProfileStoreError;
pub use json::{JsonConnection, MemoryConnection, ProfileRepository};
pub use locks::KeyLocks;
pub use traits::{KeyValueStore, NewProfile, ProfileStorage, PROFILES_STORAGE_KEY};
