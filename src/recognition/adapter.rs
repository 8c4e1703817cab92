//! Adapter layer: Convert recognition DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Downstream code never touches the raw JSON structure.

use super::dto;
use crate::recognition::domain::{
    MetadataSection, RecognitionError, RecognizedTrack, SectionEntry, SectionKind,
};

/// Id of the best match, or `None` when the service found nothing.
pub fn best_match_id(response: &dto::RecognizeResponse) -> Option<&str> {
    response.matches.first().map(|m| m.id.as_str())
}

/// Build the domain track from the recognition response and the optional
/// details lookup.
///
/// Details win for identity fields (title, subtitle, genre, release date);
/// the embedded track wins for share link, images and sections, each field
/// falling back to the other source when missing.
pub fn to_recognized(
    response: dto::RecognizeResponse,
    details: Option<dto::Track>,
) -> Result<Option<RecognizedTrack>, RecognitionError> {
    let Some(match_id) = best_match_id(&response).map(str::to_string) else {
        return Ok(None);
    };

    let embedded = response.track.unwrap_or_default();
    let details = details.unwrap_or_default();

    let title = details
        .title
        .or(embedded.title)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| RecognitionError::InvalidResponse("match has no title".to_string()))?;

    let subtitle = details
        .subtitle
        .or(embedded.subtitle)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RecognitionError::InvalidResponse("match has no subtitle".to_string()))?;

    let genre = primary_genre(details.genres).or_else(|| primary_genre(embedded.genres));

    let release_date = details
        .releasedate
        .or(embedded.releasedate)
        .filter(|d| !d.trim().is_empty());

    let share_url = share_href(embedded.share).or_else(|| share_href(details.share));

    let cover_art_url = cover_url(embedded.images).or_else(|| cover_url(details.images));

    let sections = if embedded.sections.is_empty() {
        details.sections
    } else {
        embedded.sections
    };

    Ok(Some(RecognizedTrack {
        key: embedded.key.or(details.key).unwrap_or(match_id),
        title,
        subtitle,
        genre,
        release_date,
        share_url,
        cover_art_url,
        sections: sections.into_iter().map(convert_section).collect(),
    }))
}

fn primary_genre(genres: Option<dto::Genres>) -> Option<String> {
    genres.and_then(|g| g.primary).filter(|g| !g.is_empty())
}

fn share_href(share: Option<dto::Share>) -> Option<String> {
    share.and_then(|s| s.href).filter(|h| !h.is_empty())
}

/// High-quality cover first, then the regular one.
fn cover_url(images: Option<dto::Images>) -> Option<String> {
    let images = images?;
    images
        .coverarthq
        .filter(|u| !u.is_empty())
        .or(images.coverart.filter(|u| !u.is_empty()))
}

fn convert_section(section: dto::Section) -> MetadataSection {
    MetadataSection {
        kind: SectionKind::from_service(&section.section_type),
        entries: section
            .metadata
            .into_iter()
            .filter_map(|item| {
                Some(SectionEntry {
                    title: item.title?,
                    text: item.text?,
                })
            })
            .collect(),
    }
}
