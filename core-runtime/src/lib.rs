//! # Core Runtime Module
//!
//! Foundational infrastructure for the gallery sync tool:
//! - Configuration management with fail-fast validation
//! - Logging and tracing setup
//!
//! ## Overview
//!
//! Every other crate in the workspace receives its settings from the
//! immutable [`GalleryConfig`] built here. There is no ambient global
//! configuration; components take the values they need at construction.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{GalleryConfig, GalleryConfigBuilder, StyleMap};
pub use error::{Error, Result};
