//! # JSON Storage Backend
//!
//! File-backed and in-memory key-value stores plus the profile repository
//! that keeps the profile collection as one JSON document.
//!
//! ```text
//! <data directory>/
//! └── catculator_profiles.json   ← value of "@catculator/profiles"
//! ```

pub mod connection;
pub mod memory;
pub mod profile_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use memory::MemoryConnection;
pub use profile_repository::ProfileRepository;
