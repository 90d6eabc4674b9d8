//! Local image store: style-scoped directories under the site's image root.
//!
//! File names are sanitized to a conservative character set and collisions
//! are resolved by appending an incrementing numeric suffix before the
//! extension until a free path is found.

use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes normalized images below `images_dir` and reports paths relative to
/// `site_root` for use in the manifest and rendered markup.
pub struct LocalImageStore {
    images_dir: PathBuf,
    site_root: PathBuf,
}

impl LocalImageStore {
    pub fn new<P: Into<PathBuf>>(images_dir: P, site_root: P) -> Self {
        Self {
            images_dir: images_dir.into(),
            site_root: site_root.into(),
        }
    }

    /// Persist normalized bytes for a style, returning the site-relative path.
    pub async fn save(&self, style: &str, file_name: &str, data: &[u8]) -> Result<String> {
        let style_dir = self.images_dir.join(style);
        tokio::fs::create_dir_all(&style_dir)
            .await
            .map_err(|e| SyncError::LocalStore(format!("create {}: {}", style_dir.display(), e)))?;

        let clean_name = sanitize_file_name(file_name);
        let path = free_path(&style_dir, &clean_name).await;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| SyncError::LocalStore(format!("write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = data.len(), "Saved image");

        let relative = path
            .strip_prefix(&self.site_root)
            .map_err(|_| {
                SyncError::LocalStore(format!(
                    "{} is outside the site root {}",
                    path.display(),
                    self.site_root.display()
                ))
            })?;

        Ok(relative.to_string_lossy().replace('\\', "/"))
    }
}

/// Keep alphanumerics, spaces, dashes, underscores, and dots; strip the rest
/// and any trailing whitespace.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect();
    let cleaned = cleaned.trim_end().to_string();
    if cleaned.trim_start_matches('.').is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// First non-existing path for `name` in `dir`, suffixing `_1`, `_2`, …
/// before the extension on collision.
async fn free_path(dir: &Path, name: &str) -> PathBuf {
    let mut candidate = dir.join(name);
    let (stem, suffix) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (name.to_string(), String::new()),
    };

    let mut counter = 1u32;
    while tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        candidate = dir.join(format!("{}_{}{}", stem, counter, suffix));
        counter += 1;
    }
    candidate
}
