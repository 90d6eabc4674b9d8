//! # Gallery Configuration Module
//!
//! Provides configuration management for the gallery sync tool.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`GalleryConfig`] instance holding every setting the sync run needs:
//! remote identity (credentials file, root folder), local layout (site root,
//! image directory, manifest, target document), image constraints, and the
//! style-folder dictionary. It enforces fail-fast validation so a run aborts
//! before any network call when required values are missing.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::GalleryConfig;
//!
//! let config = GalleryConfig::builder()
//!     .credentials_path("credentials/drive.json")
//!     .root_folder_id("1AbcDefGhi")
//!     .site_root("/srv/www/kaos")
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert_eq!(config.jpeg_quality, 85);
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Maximum accepted remote file size in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Advisory delay between remote listing calls, in milliseconds.
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 1000;

/// Static mapping from remote folder display names to internal style keys.
///
/// Folder names not present in the map are skipped with a warning and never
/// produce manifest entries.
#[derive(Debug, Clone)]
pub struct StyleMap {
    entries: HashMap<String, String>,
}

impl StyleMap {
    /// Create a style map from explicit display-name/style-key pairs.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, key)| (name.into(), key.into()))
                .collect(),
        }
    }

    /// Resolve a remote folder display name to its internal style key.
    pub fn resolve(&self, folder_name: &str) -> Option<&str> {
        self.entries.get(folder_name).map(String::as_str)
    }

    /// All internal style keys, in no particular order.
    pub fn style_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StyleMap {
    /// The eleven gallery styles of the site, keyed by their Drive folder
    /// display names.
    fn default() -> Self {
        Self::new([
            ("Fine Line", "fineline"),
            ("Realismo", "realismo"),
            ("Tradicional: Old School", "tradicional"),
            ("Anime", "anime"),
            ("Blackwork", "blackwork"),
            ("Cartoon", "cartoon"),
            ("Geometrico", "geometrico"),
            ("Japones", "japones"),
            ("Lettering", "lettering"),
            ("Microrealismo", "microrealismo"),
            ("Dibujos y Cuadros", "dibujos-cuadros"),
        ])
    }
}

/// Immutable configuration for a gallery sync run.
///
/// Use [`GalleryConfigBuilder`] to construct instances.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Path to the Drive credentials JSON file.
    pub credentials_path: PathBuf,

    /// ID of the Drive folder whose children are the style folders.
    pub root_folder_id: String,

    /// Root of the website checkout; manifest paths are relative to this.
    pub site_root: PathBuf,

    /// Directory where normalized images are stored, one subdirectory per style.
    pub images_dir: PathBuf,

    /// Path of the JSON manifest file.
    pub manifest_path: PathBuf,

    /// Path of the HTML document whose gallery sections are rewritten.
    pub index_path: PathBuf,

    /// Maximum accepted remote file size in bytes.
    pub max_file_size_bytes: u64,

    /// Accepted file extensions (lowercase, with leading dot).
    pub allowed_extensions: Vec<String>,

    /// Minimum decoded dimensions (width, height) in pixels.
    pub min_dimensions: (u32, u32),

    /// Maximum decoded dimensions (width, height) in pixels.
    pub max_dimensions: (u32, u32),

    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,

    /// Advisory delay after each remote listing call, in milliseconds.
    pub rate_limit_delay_ms: u64,

    /// Folder-name to style-key dictionary.
    pub styles: StyleMap,
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Credentials path and root folder ID are present
    /// - Dimension bounds are ordered
    /// - JPEG quality is in 1..=100
    /// - The rate-limit delay is within a sane bound
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(Error::Config(
                "Credentials path cannot be empty".to_string(),
            ));
        }

        if self.root_folder_id.trim().is_empty() {
            return Err(Error::Config(
                "Root folder ID cannot be empty. Set it via --root-folder or \
                 the GOOGLE_DRIVE_FOLDER_ID environment variable."
                    .to_string(),
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(Error::Config(
                "At least one allowed extension is required".to_string(),
            ));
        }

        if self.min_dimensions.0 > self.max_dimensions.0
            || self.min_dimensions.1 > self.max_dimensions.1
        {
            return Err(Error::Config(format!(
                "Minimum dimensions {:?} exceed maximum dimensions {:?}",
                self.min_dimensions, self.max_dimensions
            )));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::Config(format!(
                "JPEG quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }

        if self.rate_limit_delay_ms > 60_000 {
            return Err(Error::Config(
                "Rate limit delay exceeds maximum of 60 seconds (60,000ms)".to_string(),
            ));
        }

        if self.styles.is_empty() {
            return Err(Error::Config("Style map cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for constructing [`GalleryConfig`] instances.
///
/// Only the credentials path and root folder ID are required; every local
/// path defaults to the original site layout under `site_root`.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    credentials_path: Option<PathBuf>,
    root_folder_id: Option<String>,
    site_root: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    manifest_path: Option<PathBuf>,
    index_path: Option<PathBuf>,
    max_file_size_bytes: Option<u64>,
    allowed_extensions: Option<Vec<String>>,
    min_dimensions: Option<(u32, u32)>,
    max_dimensions: Option<(u32, u32)>,
    jpeg_quality: Option<u8>,
    rate_limit_delay_ms: Option<u64>,
    styles: Option<StyleMap>,
}

impl GalleryConfigBuilder {
    /// Sets the Drive credentials file path (required).
    pub fn credentials_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Sets the Drive root folder ID (required).
    pub fn root_folder_id(mut self, id: impl Into<String>) -> Self {
        self.root_folder_id = Some(id.into());
        self
    }

    /// Sets the website root directory. Default: current directory.
    pub fn site_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.site_root = Some(path.into());
        self
    }

    /// Sets the image output directory. Default: `<site_root>/images/STYLES`.
    pub fn images_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.images_dir = Some(path.into());
        self
    }

    /// Sets the manifest path. Default: `<site_root>/gallery_data.json`.
    pub fn manifest_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Sets the target document path. Default: `<site_root>/index.html`.
    pub fn index_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.index_path = Some(path.into());
        self
    }

    /// Sets the maximum accepted remote file size in bytes. Default: 10 MiB.
    pub fn max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.max_file_size_bytes = Some(bytes);
        self
    }

    /// Sets the accepted file extensions. Default: jpg, jpeg, png, gif, webp.
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the minimum decoded dimensions. Default: 300x300.
    pub fn min_dimensions(mut self, width: u32, height: u32) -> Self {
        self.min_dimensions = Some((width, height));
        self
    }

    /// Sets the maximum decoded dimensions. Default: 4000x4000.
    pub fn max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Sets the JPEG re-encode quality. Default: 85.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    /// Sets the advisory delay after each listing call. Default: 1000 ms.
    pub fn rate_limit_delay_ms(mut self, delay_ms: u64) -> Self {
        self.rate_limit_delay_ms = Some(delay_ms);
        self
    }

    /// Replaces the style dictionary. Default: the site's eleven styles.
    pub fn styles(mut self, styles: StyleMap) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Builds the final `GalleryConfig` instance.
    ///
    /// Returns an error when required fields are missing or any value fails
    /// validation.
    pub fn build(self) -> Result<GalleryConfig> {
        let credentials_path = self.credentials_path.ok_or_else(|| {
            Error::Config(
                "Credentials path is required. Use .credentials_path() to set it.".to_string(),
            )
        })?;

        let root_folder_id = self.root_folder_id.ok_or_else(|| {
            Error::Config(
                "Root folder ID is required. Use .root_folder_id() to set it.".to_string(),
            )
        })?;

        let site_root = self.site_root.unwrap_or_else(|| PathBuf::from("."));

        let config = GalleryConfig {
            credentials_path,
            root_folder_id,
            images_dir: self
                .images_dir
                .unwrap_or_else(|| site_root.join("images").join("STYLES")),
            manifest_path: self
                .manifest_path
                .unwrap_or_else(|| site_root.join("gallery_data.json")),
            index_path: self
                .index_path
                .unwrap_or_else(|| site_root.join("index.html")),
            site_root,
            max_file_size_bytes: self.max_file_size_bytes.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            allowed_extensions: self.allowed_extensions.unwrap_or_else(|| {
                [".jpg", ".jpeg", ".png", ".gif", ".webp"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
            min_dimensions: self.min_dimensions.unwrap_or((300, 300)),
            max_dimensions: self.max_dimensions.unwrap_or((4000, 4000)),
            jpeg_quality: self.jpeg_quality.unwrap_or(85),
            rate_limit_delay_ms: self
                .rate_limit_delay_ms
                .unwrap_or(DEFAULT_RATE_LIMIT_DELAY_MS),
            styles: self.styles.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> GalleryConfigBuilder {
        GalleryConfig::builder()
            .credentials_path("/etc/gallery/credentials.json")
            .root_folder_id("folder-root")
    }

    #[test]
    fn test_builder_requires_credentials_path() {
        let result = GalleryConfig::builder().root_folder_id("root").build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Credentials path is required"));
    }

    #[test]
    fn test_builder_requires_root_folder() {
        let result = GalleryConfig::builder()
            .credentials_path("/creds.json")
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Root folder ID is required"));
    }

    #[test]
    fn test_rejects_blank_root_folder() {
        let result = GalleryConfig::builder()
            .credentials_path("/creds.json")
            .root_folder_id("   ")
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Root folder ID cannot be empty"));
    }

    #[test]
    fn test_defaults_follow_site_root() {
        let config = minimal_builder().site_root("/srv/site").build().unwrap();

        assert_eq!(config.images_dir, PathBuf::from("/srv/site/images/STYLES"));
        assert_eq!(
            config.manifest_path,
            PathBuf::from("/srv/site/gallery_data.json")
        );
        assert_eq!(config.index_path, PathBuf::from("/srv/site/index.html"));
        assert_eq!(config.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.min_dimensions, (300, 300));
        assert_eq!(config.max_dimensions, (4000, 4000));
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.rate_limit_delay_ms, DEFAULT_RATE_LIMIT_DELAY_MS);
    }

    #[test]
    fn test_validate_rejects_inverted_dimensions() {
        let result = minimal_builder()
            .min_dimensions(500, 500)
            .max_dimensions(400, 400)
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("exceed maximum dimensions"));
    }

    #[test]
    fn test_validate_rejects_zero_quality() {
        let result = minimal_builder().jpeg_quality(0).build();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JPEG quality"));
    }

    #[test]
    fn test_validate_rejects_excessive_rate_delay() {
        let result = minimal_builder().rate_limit_delay_ms(120_000).build();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_default_style_map_has_eleven_styles() {
        let styles = StyleMap::default();
        assert_eq!(styles.len(), 11);
        assert_eq!(styles.resolve("Blackwork"), Some("blackwork"));
        assert_eq!(styles.resolve("Fine Line"), Some("fineline"));
        assert_eq!(
            styles.resolve("Tradicional: Old School"),
            Some("tradicional")
        );
        assert_eq!(styles.resolve("Dibujos y Cuadros"), Some("dibujos-cuadros"));
        assert_eq!(styles.resolve("Acuarela"), None);
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = minimal_builder().build().unwrap();
        let cloned = config.clone();
        assert_eq!(cloned.root_folder_id, config.root_folder_id);
        assert_eq!(cloned.images_dir, config.images_dir);
    }
}
