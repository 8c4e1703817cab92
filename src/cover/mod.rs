//! Cover art download.
//!
//! The image is downloaded and staged as a temporary file next to the audio
//! file it belongs to, with the extension taken from the URL. The staged file
//! lives exactly as long as the [`CoverArt`] value: it is removed when the
//! value is dropped, whether or not the tags were written.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::NetworkConfig;
use crate::error::{Error, Result, ResultExt};
use crate::net::{self, HttpError};

/// Downloaded cover art ready for embedding
#[derive(Debug)]
pub struct CoverArt {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type (image/jpeg or image/png)
    pub mime_type: String,
    /// Source URL
    pub url: String,
    staged: Option<NamedTempFile>,
}

impl CoverArt {
    /// Cover art held only in memory
    pub fn in_memory(data: Vec<u8>, mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            url: url.into(),
            staged: None,
        }
    }

    /// Path of the staged temporary file, if any
    pub fn staged_path(&self) -> Option<&Path> {
        self.staged.as_ref().map(|f| f.path())
    }
}

/// Fetch cover art for a resolved URL into `dest_dir`.
#[async_trait]
pub trait ArtFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<CoverArt>;
}

/// HTTP cover art fetcher
pub struct HttpArtFetcher {
    http_client: reqwest::Client,
    network: NetworkConfig,
}

impl HttpArtFetcher {
    pub fn new(network: NetworkConfig) -> Result<Self> {
        let http_client = net::build_client(&network)
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            network,
        })
    }

    async fn download(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let response = net::send_with_retry(&self.network, || self.http_client.get(url))
            .await
            .map_err(|e| match e {
                HttpError::Transport(e) => Error::download(url, e.to_string()),
                HttpError::Status { status, .. } => Error::download(
                    url,
                    format!("HTTP {}: {}", status, status.canonical_reason().unwrap_or("Unknown")),
                ),
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"));

        let data = response
            .bytes()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?
            .to_vec();

        Ok((data, content_type))
    }
}

#[async_trait]
impl ArtFetcher for HttpArtFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<CoverArt> {
        let (data, content_type) = self.download(url).await?;

        if data.is_empty() {
            return Err(Error::download(url, "empty response body"));
        }

        let extension = url_extension(url);
        let staged = stage(&data, dest_dir, &extension)?;
        tracing::debug!("Staged cover art at {:?}", staged.path());

        Ok(CoverArt {
            mime_type: content_type.unwrap_or_else(|| mime_for_extension(&extension).to_string()),
            data,
            url: url.to_string(),
            staged: Some(staged),
        })
    }
}

/// Write `data` to a hidden temporary file in `dest_dir`.
fn stage(data: &[u8], dest_dir: &Path, extension: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(".song-id-cover-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(dest_dir)
        .with_context(format!("creating temporary cover file in {}", dest_dir.display()))?;
    file.write_all(data)
        .with_context("writing temporary cover file")?;
    Ok(file)
}

/// Lower-case extension of the URL path, ignoring query and fragment.
/// Falls back to `jpg`.
pub fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    PathBuf::from(last_segment)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

/// MIME type guessed from a file extension
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/jpeg",
    }
}
