#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report persistence.
//!
//! Reports are stored as JSON values under string keys through the
//! [`Repository`] trait, so the extraction crates never touch storage
//! directly. Two implementations are provided: [`MemoryRepository`] and
//! [`FileRepository`] (one JSON file per key). Writes are last-writer-wins.

pub mod events;
pub mod file;
pub mod history;
pub mod keys;
pub mod memory;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use events::{EventBus, SubscriptionId, data_updated_topic};
pub use file::FileRepository;
pub use history::{load_history, record_upload, remove_upload};
pub use keys::{available_periods, parse_week_key, week_key};
pub use memory::MemoryRepository;

/// Key holding the storage format version.
pub const STORAGE_VERSION_KEY: &str = "storageVersion";

/// Current storage format version.
pub const STORAGE_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be used as a storage key.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// A lock guarding the store was poisoned.
    #[error("Storage lock poisoned")]
    Poisoned,
}

// ---------------------------------------------------------------------------
// Repository interface
// ---------------------------------------------------------------------------

/// Key-value storage of JSON values.
pub trait Repository {
    /// Loads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// * If the backing store cannot be read
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value. Returns
    /// `true` if the value was written.
    ///
    /// # Errors
    ///
    /// * If the backing store cannot be written
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<bool, StoreError>;

    /// Removes the value stored under `key`. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// * If the backing store cannot be written
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// All stored keys, sorted.
    ///
    /// # Errors
    ///
    /// * If the backing store cannot be read
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Loads and deserializes the value under `key`.
///
/// # Errors
///
/// * [`StoreError::Json`] if the stored value does not match `T`
/// * Any error of the repository
pub fn load_json<T: DeserializeOwned>(
    repo: &dyn Repository,
    key: &str,
) -> Result<Option<T>, StoreError> {
    repo.load(key)?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

/// Serializes and stores `value` under `key`, recording the storage
/// version alongside it.
///
/// # Errors
///
/// * [`StoreError::Json`] if `value` cannot be serialized
/// * Any error of the repository
pub fn save_json<T: Serialize>(
    repo: &dyn Repository,
    key: &str,
    value: &T,
) -> Result<bool, StoreError> {
    let saved = repo.save(key, &serde_json::to_value(value)?)?;
    if saved {
        repo.save(
            STORAGE_VERSION_KEY,
            &serde_json::Value::String(STORAGE_VERSION.to_owned()),
        )?;
        log::debug!("Saved '{key}'");
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use dsp_quality_models::ReportPeriod;

    use super::*;

    #[test]
    fn typed_round_trip_records_version() {
        let repo = MemoryRepository::new();
        let period = ReportPeriod::new(12, 2025);

        assert!(save_json(&repo, "period", &period).unwrap());
        assert_eq!(load_json::<ReportPeriod>(&repo, "period").unwrap(), Some(period));
        assert_eq!(
            repo.load(STORAGE_VERSION_KEY).unwrap(),
            Some(serde_json::Value::String("1.0".to_owned()))
        );
        assert_eq!(load_json::<ReportPeriod>(&repo, "missing").unwrap(), None);
    }

    #[test]
    fn mismatched_type_is_an_error() {
        let repo = MemoryRepository::new();
        save_json(&repo, "value", &"text").unwrap();
        assert!(matches!(
            load_json::<ReportPeriod>(&repo, "value"),
            Err(StoreError::Json(_))
        ));
    }
}
