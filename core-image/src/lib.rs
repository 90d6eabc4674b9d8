//! # Image Validation & Normalization
//!
//! Gatekeeper for every image entering the gallery.
//!
//! ## Overview
//!
//! Remote entries pass through two stages:
//! - Metadata validation (`validate_entry`): extension and size limits,
//!   checked before any bytes are downloaded.
//! - Normalization (`normalize`): decode, dimension bounds, alpha/palette
//!   flattening onto a white background, JPEG re-encode.
//!
//! Every failure is a per-item rejection, never a fatal error: the caller
//! logs the reason and moves on to the next entry.

pub mod error;
pub mod processor;

pub use error::{ImageError, Result};
pub use processor::{ImageLimits, ImageProcessor};
