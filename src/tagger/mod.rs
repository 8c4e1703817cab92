//! Batch tagging loop.
//!
//! For each candidate, strictly one after another:
//! 1. Recognize the audio (no match ⇒ report and move on)
//! 2. Map the match to a [`TagRecord`] and print it
//! 3. Download the cover art
//! 4. Ask the [`ConsentGate`]; write only on yes
//!
//! Any failure is contained to its file: it is reported, counted, and the
//! loop continues with the next candidate.
//!
//! [`TagRecord`]: crate::metadata::TagRecord

mod gate;

pub use gate::{AutoAccept, ConsentGate, TerminalPrompt};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cover::ArtFetcher;
use crate::error::{Error, Result, ResultExt};
use crate::metadata::{self, TagRecord, WriteResult};
use crate::recognition::{CoverTokens, RecognitionApi, map_track};

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Tags were written
    Written(WriteResult),
    /// The operator declined the write
    Declined,
    /// The service found no match
    NoMatch,
}

/// Counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub declined: usize,
    pub no_match: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.written + self.declined + self.no_match + self.failed
    }
}

/// Ties recognition, mapping, art download and tag writing together
pub struct Tagger<'a> {
    recognizer: &'a dyn RecognitionApi,
    art: &'a dyn ArtFetcher,
    tokens: CoverTokens,
    pause: Duration,
}

impl<'a> Tagger<'a> {
    pub fn new(recognizer: &'a dyn RecognitionApi, art: &'a dyn ArtFetcher, tokens: CoverTokens) -> Self {
        Self {
            recognizer,
            art,
            tokens,
            pause: Duration::ZERO,
        }
    }

    /// Wait this long between files
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Process every candidate in order.
    pub async fn run(&self, files: &[PathBuf], gate: &mut dyn ConsentGate) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (i, path) in files.iter().enumerate() {
            println!("[{}/{}] {}", i + 1, files.len(), path.display());

            match self.process_file(path, gate).await {
                Ok(FileOutcome::Written(_)) => summary.written += 1,
                Ok(FileOutcome::Declined) => summary.declined += 1,
                Ok(FileOutcome::NoMatch) => summary.no_match += 1,
                Err(e) => {
                    tracing::error!("Failed to process {:?}: {}", path, e);
                    println!("✗ Failed: {}", e);
                    summary.failed += 1;
                }
            }
            println!();

            if !self.pause.is_zero() && i + 1 < files.len() {
                tokio::time::sleep(self.pause).await;
            }
        }

        summary
    }

    /// Recognize, map, fetch art and (with consent) write one file.
    pub async fn process_file(&self, path: &Path, gate: &mut dyn ConsentGate) -> Result<FileOutcome> {
        let path = path
            .canonicalize()
            .with_context(format!("resolving {}", path.display()))?;

        let Some(track) = self.recognizer.recognize(&path).await? else {
            println!(
                "No match found for file: {} skipping...",
                path.display()
            );
            return Ok(FileOutcome::NoMatch);
        };

        let record = map_track(&track, &self.tokens);
        print_match(&path, &record, track.share_url.as_deref());

        let cover = match record.cover_art_url.as_deref() {
            Some(url) => {
                let dest_dir = path.parent().unwrap_or(Path::new("."));
                let art = self.art.fetch(url, dest_dir).await?;
                tracing::debug!(
                    "Fetched {} bytes of cover art from {} (staged at {:?})",
                    art.data.len(),
                    art.url,
                    art.staged_path()
                );
                Some(art)
            }
            None => {
                tracing::warn!("Match for {:?} has no cover art", path);
                None
            }
        };

        if !gate.confirm(&path)? {
            println!("Skipping file");
            return Ok(FileOutcome::Declined);
        }

        let result = metadata::write_tags(&path, &record, cover.as_ref())
            .map_err(|e| Error::metadata(&path, format!("{e:#}")))?;

        println!("Saved new tags to file {}", path.display());
        tracing::info!(
            "Wrote {} fields to {:?} (cover: {})",
            result.fields_written,
            path,
            result.cover_embedded
        );
        if !result.removed_tags.is_empty() {
            tracing::debug!("Removed stale tags {:?} from {:?}", result.removed_tags, path);
        }
        Ok(FileOutcome::Written(result))
    }
}

fn print_match(path: &Path, record: &TagRecord, share_url: Option<&str>) {
    let unknown = "(unknown)";
    println!("For file: \"{}\"", path.display());
    println!("Match found:");
    println!("  Title:        {}", record.title);
    println!("  Artist:       {}", record.artist);
    println!("  Album:        {}", record.album.as_deref().unwrap_or(unknown));
    println!("  Genre:        {}", record.genre.as_deref().unwrap_or(unknown));
    println!(
        "  Release Date: {}",
        record
            .release_date
            .as_deref()
            .or(record.year.as_deref())
            .unwrap_or(unknown)
    );
    if let Some(url) = share_url {
        println!("  URL:          {}", url);
    }
}
