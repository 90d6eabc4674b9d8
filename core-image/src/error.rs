//! Error types for image validation and normalization

use thiserror::Error;

/// Image validation/normalization rejections.
///
/// All variants mean "skip this item"; none of them should abort a sync run.
#[derive(Error, Debug)]
pub enum ImageError {
    /// File extension is outside the allowed set
    #[error("Unsupported file extension: {name}")]
    UnsupportedExtension { name: String },

    /// Declared file size exceeds the maximum
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    /// Decoded dimensions fall below the minimum bound
    #[error("Image too small: {width}x{height} (min {min_width}x{min_height})")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    /// Decoded dimensions exceed the maximum bound
    #[error("Image too large: {width}x{height} (max {max_width}x{max_height})")]
    TooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    /// Re-encoding to JPEG failed
    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
