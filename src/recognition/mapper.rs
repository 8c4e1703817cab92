//! Tag mapper: flatten a recognized track into the record we write.
//!
//! Rules:
//! - title, artist and genre come straight from the match; album artist
//!   repeats the artist
//! - the release date is normalised to `YYYY-MM-DD`
//! - album and year are read from song-type sections (`Album`, `Released`)
//! - the cover URL is upgraded by swapping the low-resolution token for the
//!   high-resolution one

use chrono::NaiveDate;

use crate::config::ServiceConfig;
use crate::metadata::TagRecord;
use crate::recognition::domain::RecognizedTrack;

const ALBUM_LABEL: &str = "Album";
const RELEASED_LABEL: &str = "Released";

/// Month-first formats are tried before day-first ones, so an ambiguous
/// `05-01-2020` reads as May 1st.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%B %d, %Y",
    "%b %d, %Y", "%d %B %Y", "%d %b %Y",
];

/// Resolution tokens used when upgrading cover URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverTokens {
    pub low: String,
    pub high: String,
}

impl CoverTokens {
    pub fn from_service(service: &ServiceConfig) -> Self {
        Self {
            low: service.cover_low_res_token.clone(),
            high: service.cover_high_res_token.clone(),
        }
    }
}

impl Default for CoverTokens {
    fn default() -> Self {
        Self::from_service(&ServiceConfig::default())
    }
}

/// Build the tag record for a recognized track.
pub fn map_track(track: &RecognizedTrack, tokens: &CoverTokens) -> TagRecord {
    let mut album = None;
    let mut year = None;

    for section in track.song_sections() {
        for entry in &section.entries {
            match entry.title.as_str() {
                ALBUM_LABEL => album = Some(entry.text.clone()),
                RELEASED_LABEL => year = Some(entry.text.clone()),
                _ => {}
            }
        }
    }

    let (release_date, date_year) = match track.release_date.as_deref() {
        Some(raw) => match normalize_release_date(raw) {
            Some(date) => (Some(date), None),
            None => (None, bare_year(raw)),
        },
        None => (None, None),
    };

    TagRecord {
        title: track.title.clone(),
        artist: track.subtitle.clone(),
        album_artist: track.subtitle.clone(),
        album: album.filter(|a| !a.trim().is_empty()),
        genre: track.genre.clone(),
        release_date,
        year: year.and_then(|y| bare_year(&y)).or(date_year),
        cover_art_url: track
            .cover_art_url
            .as_deref()
            .map(|url| upgrade_cover_url(url, tokens)),
    }
}

/// Swap the low-resolution token for the high-resolution one.
///
/// Literal substring substitution: a URL without the token comes back
/// unchanged, and upgrading twice equals upgrading once.
pub fn upgrade_cover_url(url: &str, tokens: &CoverTokens) -> String {
    if tokens.low.is_empty() {
        return url.to_string();
    }
    url.replace(&tokens.low, &tokens.high)
}

/// Parse a service date string into `YYYY-MM-DD`.
///
/// Accepts plain dates in the formats above and RFC 3339 / ISO date-times.
/// Returns `None` for anything else, including a bare year.
pub fn normalize_release_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            // Date-times: keep the calendar date in the string's own offset
            raw.get(..10)
                .filter(|_| raw.len() > 10 && raw.as_bytes()[10] == b'T')
                .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        })?;

    Some(date.format("%Y-%m-%d").to_string())
}

/// Four-digit year at the start of `raw` (`"2020"`, `"2020-05"`).
fn bare_year(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let year = raw.get(..4)?;
    let rest_ok = raw.len() == 4 || !raw.as_bytes()[4].is_ascii_digit();
    (year.chars().all(|c| c.is_ascii_digit()) && rest_ok).then(|| year.to_string())
}
