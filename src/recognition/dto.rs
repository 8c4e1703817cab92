//! Recognition service Data Transfer Objects
//!
//! These types match what the service returns, trimmed to the fields we read.
//! DO NOT use these types outside the recognition module - convert to domain types.
//!
//! Example recognition response:
//! ```json
//! {
//!   "matches": [{"id": "11223344", "offset": 12.3}],
//!   "track": {
//!     "key": "55667788",
//!     "title": "Song",
//!     "subtitle": "Artist",
//!     "genres": {"primary": "Rock"},
//!     "share": {"href": "https://www.shazam.com/track/55667788/song"},
//!     "images": {"coverart": ".../400x400cc.jpg", "coverarthq": ".../400x400cc.jpg"},
//!     "sections": [{
//!       "type": "SONG",
//!       "metadata": [{"title": "Album", "text": "LP"}, {"title": "Released", "text": "2020"}]
//!     }]
//!   }
//! }
//! ```
//!
//! The details ("about") endpoint returns a bare track object of the same
//! shape, usually with `releasedate` filled in.

use serde::{Deserialize, Serialize};

/// Body of the recognition (tag) request
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeRequest {
    pub geolocation: Geolocation,
    pub signature: SignaturePayload,
    pub timestamp: u64,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Geolocation {
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignaturePayload {
    pub uri: String,
    pub samplems: u64,
    pub timestamp: u64,
}

/// Top-level recognition response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognizeResponse {
    /// Zero or more matches, best first
    #[serde(default)]
    pub matches: Vec<Match>,
    /// Details of the best match, when there is one
    pub track: Option<Track>,
}

/// A single match entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Match {
    pub id: String,
    pub offset: Option<f64>,
}

/// Track object shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Track {
    pub key: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub genres: Option<Genres>,
    pub share: Option<Share>,
    pub images: Option<Images>,
    pub releasedate: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genres {
    pub primary: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Share {
    pub href: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Images {
    pub background: Option<String>,
    pub coverart: Option<String>,
    pub coverarthq: Option<String>,
}

/// One metadata section; sections without a `metadata` list are kept empty
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub metadata: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataItem {
    pub title: Option<String>,
    pub text: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// If these fail, the service has changed and the DTOs need updating.
// ============================================================================
