//! # Gallery Document Module
//!
//! Renders manifest records into HTML gallery fragments and splices them
//! into the site's index document.
//!
//! ## Overview
//!
//! - **Fragment Renderer** (`render`): one markup block per image with
//!   staggered animation delays and filename-derived titles
//! - **Document Splicer** (`splice`): pattern-based replacement of a
//!   style's gallery region; no match means no change, never an error
//!
//! A timestamped backup of the index document is written before any splice
//! attempt in a run, and the document is rewritten at most once per run.

pub mod error;
pub mod render;
pub mod splice;

pub use error::{GalleryError, Result};
pub use render::render_style_items;
pub use splice::{splice, DocumentUpdater, SpliceOutcome};
