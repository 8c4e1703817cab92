//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`RecognitionError`]) for detailed handling
//! - Per-file errors are reported and counted by the batch loop; only
//!   configuration errors reach `main`
//!
//! [`RecognitionError`]: crate::recognition::RecognitionError

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata reading/writing error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Recognition service or signature failure
    #[error("Recognition error: {0}")]
    Recognition(#[from] crate::recognition::RecognitionError),

    /// Cover art download failure
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Root path is missing or not a directory
    #[error("Invalid directory: {0}")]
    InvalidDirectory(PathBuf),

    /// Interactive prompt could not be shown or read
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a download error.
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid directory error.
    pub fn invalid_directory(path: impl Into<PathBuf>) -> Self {
        Self::InvalidDirectory(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RecognitionError;

    #[test]
    fn test_invalid_directory_display() {
        let err = Error::invalid_directory("/no/such/dir");
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::download("https://img.example/a.jpg", "HTTP 404").context("fetching art");
        let msg = err.to_string();
        assert!(msg.contains("fetching art"));
        assert!(msg.contains("HTTP 404"));
    }

    #[test]
    fn test_metadata_error() {
        let err = Error::metadata("/music/song.mp3", "unsupported format");
        let msg = err.to_string();
        assert!(msg.contains("song.mp3"));
        assert!(msg.contains("unsupported format"));
    }

    #[test]
    fn test_recognition_error_converts() {
        let err: Error = RecognitionError::Network("timed out".to_string()).into();
        assert!(matches!(err, Error::Recognition(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_result_ext_on_io() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let with_ctx = result.with_context("reading art");
        assert!(with_ctx.unwrap_err().to_string().contains("reading art"));
    }
}
