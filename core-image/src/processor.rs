//! Image processing pipeline: validate, decode, flatten, re-encode.
//!
//! The processor is deliberately strict: anything outside the configured
//! envelope is rejected rather than repaired. Oversized images are dropped,
//! not scaled.

use crate::error::{ImageError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use tracing::debug;

/// Constraints applied to every incoming image.
#[derive(Debug, Clone)]
pub struct ImageLimits {
    /// Maximum declared remote file size in bytes.
    pub max_file_size_bytes: u64,

    /// Accepted file extensions (lowercase, with leading dot).
    pub allowed_extensions: Vec<String>,

    /// Minimum decoded (width, height) in pixels.
    pub min_dimensions: (u32, u32),

    /// Maximum decoded (width, height) in pixels.
    pub max_dimensions: (u32, u32),

    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: [".jpg", ".jpeg", ".png", ".gif", ".webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_dimensions: (300, 300),
            max_dimensions: (4000, 4000),
            jpeg_quality: 85,
        }
    }
}

/// Validates image entries and normalizes their content to flattened JPEG.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    limits: ImageLimits,
}

impl ImageProcessor {
    /// Create a processor with the given limits.
    pub fn new(limits: ImageLimits) -> Self {
        Self { limits }
    }

    /// Validate a remote entry's metadata before downloading it.
    ///
    /// Rejects entries whose extension is outside the allowed set
    /// (case-insensitive) or whose declared size exceeds the maximum.
    pub fn validate_entry(&self, name: &str, size: u64) -> Result<()> {
        let lowered = name.to_lowercase();
        if !self
            .limits
            .allowed_extensions
            .iter()
            .any(|ext| lowered.ends_with(ext))
        {
            return Err(ImageError::UnsupportedExtension {
                name: name.to_string(),
            });
        }

        if size > self.limits.max_file_size_bytes {
            return Err(ImageError::FileTooLarge {
                size,
                max: self.limits.max_file_size_bytes,
            });
        }

        Ok(())
    }

    /// Decode, bound-check, flatten, and re-encode image bytes as JPEG.
    ///
    /// Images with an alpha channel or palette color mode are composited
    /// onto an opaque white background, using the image's own alpha channel
    /// as the mask. Dimension violations and decode failures are rejections,
    /// not fatal errors.
    pub fn normalize(&self, data: &[u8]) -> Result<Vec<u8>> {
        let img =
            image::load_from_memory(data).map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

        let (width, height) = (img.width(), img.height());
        let (min_w, min_h) = self.limits.min_dimensions;
        let (max_w, max_h) = self.limits.max_dimensions;

        if width < min_w || height < min_h {
            return Err(ImageError::TooSmall {
                width,
                height,
                min_width: min_w,
                min_height: min_h,
            });
        }

        if width > max_w || height > max_h {
            return Err(ImageError::TooLarge {
                width,
                height,
                max_width: max_w,
                max_height: max_h,
            });
        }

        let rgb = match img {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => flatten_onto_white(other.to_rgba8()),
        };

        debug!(width, height, "Re-encoding image as JPEG");

        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, self.limits.jpeg_quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;

        Ok(out)
    }
}

/// Composite an RGBA image onto an opaque white background.
fn flatten_onto_white(rgba: RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut flat = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |c: u8| (((c as u32 * alpha) + 255 * (255 - alpha)) / 255) as u8;
        flat.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    flat
}
