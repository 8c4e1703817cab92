//! Internal domain models for recognized tracks.
//!
//! These types are OUR types - they don't change when the service's JSON
//! changes. Responses are converted into them by the adapter.

/// A single best match returned by the recognition service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedTrack {
    /// Service track key (used for the details lookup)
    pub key: String,
    /// Track title
    pub title: String,
    /// Subtitle; the service puts the performing artist here
    pub subtitle: String,
    /// Primary genre
    pub genre: Option<String>,
    /// Release date exactly as the service formats it
    pub release_date: Option<String>,
    /// Public share link
    pub share_url: Option<String>,
    /// Best available cover image URL (high-quality variant preferred)
    pub cover_art_url: Option<String>,
    /// Sectioned metadata (song, lyrics, artist, ...)
    pub sections: Vec<MetadataSection>,
}

/// One section of the track's metadata blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSection {
    pub kind: SectionKind,
    pub entries: Vec<SectionEntry>,
}

/// Section type tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Song,
    Lyrics,
    Video,
    Artist,
    Related,
    Other(String),
}

impl SectionKind {
    /// Map the service's type string (`"SONG"`, `"LYRICS"`, ...).
    pub fn from_service(kind: &str) -> Self {
        match kind.to_ascii_uppercase().as_str() {
            "SONG" => Self::Song,
            "LYRICS" => Self::Lyrics,
            "VIDEO" => Self::Video,
            "ARTIST" => Self::Artist,
            "RELATED" => Self::Related,
            _ => Self::Other(kind.to_string()),
        }
    }
}

/// Labelled metadata value, e.g. `Album: LP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub title: String,
    pub text: String,
}

/// Audio signature produced by the external generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// `data:audio/vnd.shazam.sig;base64,...`
    pub uri: String,
    /// Length of audio the signature covers
    pub sample_ms: u64,
}

/// Errors that can occur during recognition
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("Failed to generate signature: {0}")]
    Signature(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl RecognizedTrack {
    /// Sections tagged as song-level metadata.
    pub fn song_sections(&self) -> impl Iterator<Item = &MetadataSection> {
        self.sections
            .iter()
            .filter(|section| section.kind == SectionKind::Song)
    }
}
