use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// Index document could not be read or written
    #[error("Document I/O failed: {0}")]
    Io(String),

    /// Splice pattern could not be compiled
    #[error("Splice pattern invalid: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
