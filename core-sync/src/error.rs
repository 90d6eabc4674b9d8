use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Remote listing or download failure for one call
    #[error("Retrieval failed: {0}")]
    Source(String),

    /// Manifest could not be written
    #[error("Manifest persistence failed: {0}")]
    Manifest(String),

    /// Normalized image could not be written to the local store
    #[error("Local store failure: {0}")]
    LocalStore(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
