//! Persistence for the analytics store

use super::AnalyticsStore;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Current store schema version
pub const STORE_VERSION: u32 = 1;

/// Load the analytics store from disk.
///
/// The store degrades rather than blocks: a missing file, unreadable file,
/// unparseable contents, or a version newer than this binary understands
/// all yield an empty store with a warning. The run's own analytics must
/// never be forfeited to a bad history file.
pub fn load_store(path: &Path) -> AnalyticsStore {
    if !path.exists() {
        return AnalyticsStore::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read analytics store, starting empty");
            return AnalyticsStore::default();
        }
    };

    let store: AnalyticsStore = match serde_json::from_str(&content) {
        Ok(store) => store,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse analytics store, starting empty");
            return AnalyticsStore::default();
        }
    };

    if store.version > STORE_VERSION {
        warn!(
            path = %path.display(),
            version = store.version,
            supported = STORE_VERSION,
            "analytics store written by a newer version, starting empty"
        );
        return AnalyticsStore::default();
    }

    store
}

/// Save the analytics store to disk.
///
/// Creates the parent directory if needed and writes via a temporary file
/// renamed into place, so a failed write cannot destroy the prior valid
/// contents.
pub fn save_store(path: &Path, store: &AnalyticsStore) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Analytics(format!("failed to create {}: {e}", dir.display())))?;
    }

    let mut store_to_save = store.clone();
    store_to_save.version = STORE_VERSION;

    let content = serde_json::to_string_pretty(&store_to_save)
        .map_err(|e| Error::Analytics(format!("failed to serialize analytics store: {e}")))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .map_err(|e| Error::Analytics(format!("failed to write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| Error::Analytics(format!("failed to replace {}: {e}", path.display())))?;

    Ok(())
}
