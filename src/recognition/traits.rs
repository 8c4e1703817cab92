//! Trait definition for the recognition collaborator.
//!
//! The batch loop only talks to [`RecognitionApi`], so tests substitute a
//! mock (see `mocks::MockRecognizer`) for the network client.

use async_trait::async_trait;
use std::path::Path;

use super::domain::{RecognitionError, RecognizedTrack};

/// Identify the audio in a file.
///
/// `Ok(None)` is the explicit no-match outcome and is not an error.
#[async_trait]
pub trait RecognitionApi: Send + Sync {
    async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError>;
}

#[async_trait]
impl RecognitionApi for super::client::ShazamClient {
    async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        self.recognize(path).await
    }
}
