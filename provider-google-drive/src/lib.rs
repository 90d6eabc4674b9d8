//! # Google Drive Provider
//!
//! Implements the `RemoteSource` trait for the Google Drive v3 API.
//!
//! ## Overview
//!
//! This module provides:
//! - OAuth token refresh from stored credentials
//! - Folder and image listing with server-side query filtering
//! - Paged listing with advisory inter-call pacing
//! - Full-content downloads via `alt=media`
//!
//! Each API call is attempted exactly once; a failure surfaces to the caller
//! as a per-call error with no retry.

pub mod auth;
pub mod connector;
pub mod error;
pub mod http;
pub mod types;

pub use auth::{Authenticator, StoredCredentials};
pub use connector::DriveConnector;
pub use error::{DriveError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient};
