//! Remote source seam
//!
//! Storage providers implement [`RemoteSource`] to expose style folders and
//! their image entries. The reconciler only ever talks to this trait, which
//! keeps it testable with mock providers.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// A style folder found under the configured remote root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFolder {
    /// Remote-assigned stable ID
    pub id: String,
    /// Display name, resolved through the style dictionary
    pub name: String,
}

/// An image entry inside a remote style folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    /// Remote-assigned stable ID
    pub id: String,
    /// File name as stored remotely
    pub name: String,
    /// Declared size in bytes, when the provider reports one
    pub size: Option<u64>,
    /// Provider content checksum (MD5 for Drive), when reported
    pub checksum: Option<String>,
    /// Creation time (RFC 3339, verbatim from the provider)
    pub created_time: String,
    /// Modification time (RFC 3339, verbatim from the provider)
    pub modified_time: String,
}

/// Read-only view of a remote file-storage service.
///
/// Implementations must filter out soft-deleted entries and restrict image
/// listings to the provider's image MIME whitelist. Listing calls are
/// expected to apply their own advisory inter-call pacing.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// List the direct folder children of the configured root container.
    async fn list_style_folders(&self) -> Result<Vec<RemoteFolder>>;

    /// List image entries in a folder, most recently modified first.
    async fn list_images(&self, folder_id: &str) -> Result<Vec<RemoteImage>>;

    /// Download the full content of a remote object.
    async fn download(&self, file_id: &str) -> Result<Bytes>;
}
