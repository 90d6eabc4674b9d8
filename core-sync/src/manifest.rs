//! Gallery manifest: the durable record of every synced image per style.
//!
//! The manifest is a single JSON document with a `last_sync` timestamp and a
//! style-key → record-list mapping. It is loaded once at process start
//! (tolerantly: a missing or corrupt file yields an empty default), mutated
//! in memory during the run, and persisted exactly once at run end.

use crate::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One synced image.
///
/// `hash` is the remote checksum observed at last successful sync, not a
/// hash of the re-encoded local bytes; `size` is the byte length of the
/// normalized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Remote-assigned stable ID (identity)
    pub id: String,
    /// Remote file name
    pub name: String,
    /// Path of the normalized local copy, relative to the site root
    pub local_path: String,
    /// Remote content checksum at last sync
    pub hash: String,
    /// Remote creation time (RFC 3339, verbatim)
    pub created_time: String,
    /// Remote modification time (RFC 3339, verbatim)
    pub modified_time: String,
    /// Size of the normalized local bytes
    pub size: u64,
    /// When this record was created
    pub sync_time: DateTime<Utc>,
}

/// Ordered map of style key to the style's record list.
///
/// Record lists are appended-only across runs; existing entries are never
/// reordered or replaced.
pub type StyleManifest = BTreeMap<String, Vec<ImageRecord>>;

/// The whole manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryData {
    /// Completion time of the last successful sync run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,

    /// Style key → synced image records
    #[serde(default)]
    pub images: StyleManifest,
}

impl GalleryData {
    /// Total number of records across all styles.
    pub fn record_count(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }
}

/// Reads and writes the manifest file.
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Load the manifest, tolerating a missing or malformed file.
    ///
    /// Both conditions log a warning and return the empty default rather
    /// than failing the run.
    pub async fn load(&self) -> GalleryData {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read manifest, starting empty");
                return GalleryData::default();
            }
        };

        match serde_json::from_slice::<GalleryData>(&raw) {
            Ok(data) => {
                debug!(
                    records = data.record_count(),
                    styles = data.images.len(),
                    "Loaded manifest"
                );
                data
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Manifest is malformed, starting empty");
                GalleryData::default()
            }
        }
    }

    /// Overwrite the manifest file with the given state.
    ///
    /// A failure here is reported to the caller but must not roll back the
    /// in-memory state; no retry is attempted.
    pub async fn save(&self, data: &GalleryData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| SyncError::Manifest(format!("serialization failed: {}", e)))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| SyncError::Manifest(format!("write failed: {}", e)))?;

        info!(path = %self.path.display(), records = data.record_count(), "Manifest saved");
        Ok(())
    }
}
