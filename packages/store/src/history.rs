//! Upload history, newest entry first.

use chrono::{DateTime, Utc};
use dsp_quality_models::{ReportCategory, UploadHistoryEntry};

use crate::{Repository, StoreError, load_json, save_json};

/// Key holding the upload history.
pub const HISTORY_KEY: &str = "upload_history";

/// Default number of retained entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Loads the upload history, newest first.
///
/// # Errors
///
/// * If the stored history cannot be read or decoded
pub fn load_history(repo: &dyn Repository) -> Result<Vec<UploadHistoryEntry>, StoreError> {
    Ok(load_json(repo, HISTORY_KEY)?.unwrap_or_default())
}

/// Prepends an entry, keeping at most `limit` entries.
///
/// # Errors
///
/// * If the history cannot be read or written
pub fn record_upload(
    repo: &dyn Repository,
    entry: UploadHistoryEntry,
    limit: usize,
) -> Result<Vec<UploadHistoryEntry>, StoreError> {
    let mut history = load_history(repo)?;
    history.insert(0, entry);
    if history.len() > limit {
        log::debug!("Trimming upload history to {limit} entries");
        history.truncate(limit);
    }
    save_json(repo, HISTORY_KEY, &history)?;
    Ok(history)
}

/// Removes the entry matching name, timestamp and category. Returns `true`
/// if one was removed.
///
/// # Errors
///
/// * If the history cannot be read or written
pub fn remove_upload(
    repo: &dyn Repository,
    name: &str,
    timestamp: DateTime<Utc>,
    category: ReportCategory,
) -> Result<bool, StoreError> {
    let mut history = load_history(repo)?;
    let before = history.len();
    history.retain(|e| !(e.name == name && e.timestamp == timestamp && e.category == category));
    if history.len() == before {
        return Ok(false);
    }
    save_json(repo, HISTORY_KEY, &history)?;
    Ok(true)
}
