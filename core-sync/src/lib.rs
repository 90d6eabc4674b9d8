//! # Gallery Sync Module
//!
//! Reconciles remote style folders against the local gallery manifest.
//!
//! ## Overview
//!
//! This crate owns the core decision loop of the tool:
//! - Listing remote folders and images via the [`RemoteSource`] seam
//! - Deciding per item: skip-unchanged, add-new, or reject-invalid
//! - Persisting normalized images under style-scoped directories
//! - Maintaining the durable JSON manifest
//!
//! ## Components
//!
//! - **Remote Source Seam** (`source`): trait implemented by storage providers
//! - **Manifest Store** (`manifest`): tolerant load, single save per run
//! - **Local Image Store** (`store`): sanitized filenames, collision suffixing
//! - **Reconciler** (`reconciler`): the per-run decision engine and report

pub mod error;
pub mod manifest;
pub mod reconciler;
pub mod source;
pub mod store;

pub use error::{Result, SyncError};
pub use manifest::{GalleryData, ImageRecord, ManifestStore, StyleManifest};
pub use reconciler::{ItemOutcome, Reconciler, SyncReport};
pub use source::{RemoteFolder, RemoteImage, RemoteSource};
pub use store::LocalImageStore;
