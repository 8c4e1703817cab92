//! Test utilities and fixtures for song-id tests.
//!
//! This module provides audio file fixtures, a sample recognized track and
//! mock collaborators for the batch loop.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{write_silent_mp3, sample_track, MockArtFetcher};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let path = dir.path().join("a.mp3");
//!     write_silent_mp3(&path);
//!     // ... test logic
//! }
//! ```

use async_trait::async_trait;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cover::{ArtFetcher, CoverArt};
use crate::error::{Error, Result};
use crate::recognition::domain::{MetadataSection, RecognizedTrack, SectionEntry, SectionKind};
use crate::tagger::ConsentGate;

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
/// 144 * 128000 / 44100, no padding
const FRAME_LEN: usize = 417;
const FRAME_COUNT: usize = 20;

/// Writes a short, untagged MP3 stream of silent frames.
pub fn write_silent_mp3(path: &Path) {
    let mut data = Vec::with_capacity(FRAME_LEN * FRAME_COUNT);
    for _ in 0..FRAME_COUNT {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&FRAME_HEADER);
        data.extend_from_slice(&frame);
    }
    std::fs::write(path, data).expect("Failed to write test mp3");
}

/// Writes a silent MP3 with an ID3v2 tag carrying the given core fields.
pub fn write_tagged_mp3(
    path: &Path,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
) {
    write_silent_mp3(path);

    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(title) = title {
        tag.set_title(title.to_string());
    }
    if let Some(artist) = artist {
        tag.set_artist(artist.to_string());
    }
    if let Some(album) = album {
        tag.set_album(album.to_string());
    }
    tag.save_to_path(path, WriteOptions::default())
        .expect("Failed to write test tag");
}

/// Reads back the primary tag of a file with lofty's default (strict) options.
pub fn read_primary_tag(path: &Path) -> Tag {
    let tagged_file = Probe::open(path)
        .expect("Failed to open test file")
        .guess_file_type()
        .expect("Failed to detect test file type")
        .read()
        .expect("Failed to read test file");
    tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .cloned()
        .expect("Test file has no tag")
}

/// Small in-memory JPEG-ish cover.
pub fn sample_cover() -> CoverArt {
    CoverArt::in_memory(
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9],
        "image/jpeg",
        "https://img.example/1000x1000cc.jpg",
    )
}

/// The track every end-to-end test recognizes.
pub fn sample_track() -> RecognizedTrack {
    RecognizedTrack {
        key: "mock-key".to_string(),
        title: "Song".to_string(),
        subtitle: "Artist".to_string(),
        genre: Some("Rock".to_string()),
        release_date: Some("2020-05-01".to_string()),
        share_url: Some("https://www.shazam.com/track/1/song".to_string()),
        cover_art_url: Some("https://img.example/400x400cc.jpg".to_string()),
        sections: vec![MetadataSection {
            kind: SectionKind::Song,
            entries: vec![SectionEntry {
                title: "Album".to_string(),
                text: "LP".to_string(),
            }],
        }],
    }
}

/// Mock art fetcher that records requested URLs.
pub struct MockArtFetcher {
    fail: bool,
    urls: Mutex<Vec<String>>,
}

impl MockArtFetcher {
    /// Create a mock that returns a placeholder cover.
    pub fn with_placeholder() -> Self {
        Self {
            fail: false,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose downloads always fail.
    pub fn with_error() -> Self {
        Self {
            fail: true,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtFetcher for MockArtFetcher {
    async fn fetch(&self, url: &str, _dest_dir: &Path) -> Result<CoverArt> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(Error::download(url, "HTTP 404: Not Found"));
        }
        let mut cover = sample_cover();
        cover.url = url.to_string();
        Ok(cover)
    }
}

/// Consent gate that replays scripted answers, then declines.
pub struct ScriptedGate {
    answers: Vec<bool>,
    asked: AtomicUsize,
}

impl ScriptedGate {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers,
            asked: AtomicUsize::new(0),
        }
    }

    /// How many times the gate was consulted
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl ConsentGate for ScriptedGate {
    fn confirm(&mut self, _path: &Path) -> Result<bool> {
        let i = self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.get(i).copied().unwrap_or(false))
    }
}
