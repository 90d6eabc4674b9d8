//! # Reconciliation Engine
//!
//! Decides, for every remote image entry, whether it is unchanged, new, or
//! invalid, and produces the manifest delta for the run.
//!
//! ## Workflow
//!
//! 1. List style folders under the remote root
//! 2. Resolve each folder name through the style dictionary; unknown names
//!    are skipped entirely (no record, no error)
//! 3. For each image entry, in listing order:
//!    - skip when its ID is already known and the remote checksum matches
//!      the stored hash (no re-download, no re-validation)
//!    - otherwise validate metadata, download, normalize, persist locally,
//!      and append a fresh [`ImageRecord`]
//! 4. Stamp `last_sync` and persist the manifest exactly once
//!
//! A changed remote file (known ID, different checksum) appends a second
//! record instead of updating the first. That is pinned, observed behavior;
//! see the tests.
//!
//! Every per-item failure is a skip. Nothing in here aborts the run.

use crate::manifest::{GalleryData, ImageRecord, ManifestStore};
use crate::source::{RemoteImage, RemoteSource};
use crate::store::LocalImageStore;
use chrono::Utc;
use core_image::ImageProcessor;
use core_runtime::config::StyleMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Decision made for a single remote image entry.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Known ID with matching checksum; nothing to do
    Unchanged,
    /// Downloaded, normalized, and persisted; record ready to append
    Added(ImageRecord),
    /// Rejected before download (extension or declared size)
    RejectedMetadata,
    /// Rejected after download (decode failure or dimension bounds)
    RejectedImage,
    /// Remote content could not be retrieved
    DownloadFailed,
    /// Normalized bytes could not be written locally
    SaveFailed,
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Remote folders returned by the listing
    pub folders_seen: usize,
    /// Folders whose display name is not in the style dictionary
    pub unknown_folders: usize,
    /// New records appended to the manifest
    pub added: usize,
    /// Entries skipped via the unchanged-checksum short-circuit
    pub unchanged: usize,
    /// Entries rejected by metadata or image validation
    pub rejected: usize,
    /// Entries that failed to download or persist
    pub failed: usize,
    /// Whether the manifest write at run end succeeded
    pub manifest_saved: bool,
}

impl SyncReport {
    /// True when the run appended at least one record.
    pub fn has_changes(&self) -> bool {
        self.added > 0
    }
}

/// The per-run reconciliation engine.
///
/// Owns its collaborators for the duration of a run; there is exactly one
/// writer of the manifest and no concurrent invocation is supported.
pub struct Reconciler {
    source: Arc<dyn RemoteSource>,
    processor: ImageProcessor,
    store: LocalImageStore,
    manifest_store: ManifestStore,
    styles: StyleMap,
}

impl Reconciler {
    pub fn new(
        source: Arc<dyn RemoteSource>,
        processor: ImageProcessor,
        store: LocalImageStore,
        manifest_store: ManifestStore,
        styles: StyleMap,
    ) -> Self {
        Self {
            source,
            processor,
            store,
            manifest_store,
            styles,
        }
    }

    /// Run one full reconciliation pass, mutating `gallery` in place.
    ///
    /// `last_sync` is stamped and the manifest is persisted exactly once,
    /// after all folders are processed. A manifest save failure is logged
    /// and reflected in the report; the in-memory state is kept as-is.
    #[instrument(skip_all)]
    pub async fn run(&self, gallery: &mut GalleryData) -> SyncReport {
        let mut report = SyncReport::default();

        let folders = match self.source.list_style_folders().await {
            Ok(folders) => folders,
            Err(e) => {
                warn!(error = %e, "Failed to list style folders");
                Vec::new()
            }
        };
        info!(count = folders.len(), "Found style folders");

        for folder in folders {
            report.folders_seen += 1;

            let Some(style) = self.styles.resolve(&folder.name) else {
                warn!(folder = %folder.name, "Unknown style folder, skipping");
                report.unknown_folders += 1;
                continue;
            };
            info!(folder = %folder.name, style, "Processing style");

            let images = match self.source.list_images(&folder.id).await {
                Ok(images) => images,
                Err(e) => {
                    warn!(folder = %folder.name, error = %e, "Failed to list images, skipping folder");
                    continue;
                }
            };

            // Known record lookup for this style, keyed by remote ID.
            let known: HashMap<String, String> = gallery
                .images
                .get(style)
                .map(|records| {
                    records
                        .iter()
                        .map(|r| (r.id.clone(), r.hash.clone()))
                        .collect()
                })
                .unwrap_or_default();

            let mut new_records = Vec::new();
            for image in &images {
                match self.process_image(style, image, &known).await {
                    ItemOutcome::Unchanged => report.unchanged += 1,
                    ItemOutcome::Added(record) => {
                        info!(
                            name = %record.name,
                            local_path = %record.local_path,
                            "Added new image"
                        );
                        new_records.push(record);
                        report.added += 1;
                    }
                    ItemOutcome::RejectedMetadata | ItemOutcome::RejectedImage => {
                        report.rejected += 1
                    }
                    ItemOutcome::DownloadFailed | ItemOutcome::SaveFailed => report.failed += 1,
                }
            }

            if !new_records.is_empty() {
                gallery
                    .images
                    .entry(style.to_string())
                    .or_default()
                    .extend(new_records);
            }
        }

        gallery.last_sync = Some(Utc::now());
        match self.manifest_store.save(gallery).await {
            Ok(()) => report.manifest_saved = true,
            Err(e) => warn!(error = %e, "Failed to save manifest; this run's work is not durable"),
        }

        info!(
            added = report.added,
            unchanged = report.unchanged,
            rejected = report.rejected,
            failed = report.failed,
            "Sync completed"
        );

        report
    }

    /// Decide and execute the pipeline for a single remote image entry.
    async fn process_image(
        &self,
        style: &str,
        image: &RemoteImage,
        known: &HashMap<String, String>,
    ) -> ItemOutcome {
        let remote_checksum = image.checksum.clone().unwrap_or_default();

        // A known ID with an unchanged checksum needs no work at all. A
        // known ID with a different checksum falls through and appends a
        // second record for the same ID.
        if let Some(stored_hash) = known.get(&image.id) {
            if *stored_hash == remote_checksum {
                debug!(name = %image.name, "Unchanged, skipping");
                return ItemOutcome::Unchanged;
            }
        }

        if let Err(e) = self
            .processor
            .validate_entry(&image.name, image.size.unwrap_or(0))
        {
            warn!(name = %image.name, reason = %e, "Rejected by metadata validation");
            return ItemOutcome::RejectedMetadata;
        }

        let raw = match self.source.download(&image.id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(name = %image.name, error = %e, "Download failed");
                return ItemOutcome::DownloadFailed;
            }
        };

        let normalized = match self.processor.normalize(&raw) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(name = %image.name, reason = %e, "Rejected by image validation");
                return ItemOutcome::RejectedImage;
            }
        };

        let local_path = match self.store.save(style, &image.name, &normalized).await {
            Ok(path) => path,
            Err(e) => {
                warn!(name = %image.name, error = %e, "Failed to save image locally");
                return ItemOutcome::SaveFailed;
            }
        };

        ItemOutcome::Added(ImageRecord {
            id: image.id.clone(),
            name: image.name.clone(),
            local_path,
            hash: remote_checksum,
            created_time: image.created_time.clone(),
            modified_time: image.modified_time.clone(),
            size: normalized.len() as u64,
            sync_time: Utc::now(),
        })
    }
}
