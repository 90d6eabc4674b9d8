use core_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriveError {
    /// Credentials file missing, unreadable, or incomplete
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Token endpoint rejected the refresh request
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Drive API returned a non-success status
    #[error("Drive API error {status_code}: {message}")]
    ApiError { status_code: u16, message: String },

    /// Transport-level failure before a status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Response parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, DriveError>;

impl From<DriveError> for SyncError {
    fn from(e: DriveError) -> Self {
        SyncError::Source(e.to_string())
    }
}
