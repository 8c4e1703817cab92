//! Audio file tag inspection and writing.
//!
//! Uses the lofty crate for format-independent metadata access.
//!
//! # Features
//! - Decide whether a file's core tags (title/artist/album) are all unset
//! - Rewrite a file's tag block from a [`TagRecord`] plus front-cover art,
//!   clearing everything that was there before

use anyhow::{Context, Result};
use lofty::TextEncoding;
use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::TaggedFileExt;
use lofty::id3::v2::{Frame, FrameId, Id3v2Tag, TimestampFrame};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::items::Timestamp;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::borrow::Cow;
use std::path::Path;

use crate::cover::CoverArt;

/// Flattened tags to write for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRecord {
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// `YYYY-MM-DD`
    pub release_date: Option<String>,
    /// Four-digit year, used when no full date is known
    pub year: Option<String>,
    /// Resolved (high-resolution) cover art URL
    pub cover_art_url: Option<String>,
}

/// Summary of a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Number of text fields written
    pub fields_written: usize,
    /// Whether a front cover was embedded
    pub cover_embedded: bool,
    /// Secondary tag blocks stripped from the file (e.g. ID3v1)
    pub removed_tags: Vec<TagType>,
}

fn parse_options() -> ParseOptions {
    ParseOptions::new().parsing_mode(ParsingMode::Relaxed)
}

/// True when title, artist and album are all unset in every tag block.
///
/// Files that cannot be opened or parsed, or that carry no tag at all,
/// count as empty. The format is sniffed from content, so `song.mp3.part`
/// reads like `song.mp3`. Never fails.
pub fn tags_empty(path: &Path) -> bool {
    let Ok(probe) = Probe::open(path) else {
        return true;
    };
    let Ok(probe) = probe.guess_file_type() else {
        return true;
    };
    let Ok(tagged_file) = probe
        .options(parse_options().read_properties(false))
        .read()
    else {
        return true;
    };

    tagged_file
        .tags()
        .iter()
        .all(|tag| tag.title().is_none() && tag.artist().is_none() && tag.album().is_none())
}

/// Rewrite the tags of `path` from `record`, embedding `cover` as the front cover.
///
/// The primary tag is rebuilt from scratch in memory and saved in one call
/// (ID3v2 is written as version 2.3). Other tag blocks the file carries are
/// then removed so no stale fields survive. Unset optional fields are skipped.
pub fn write_tags(path: &Path, record: &TagRecord, cover: Option<&CoverArt>) -> Result<WriteResult> {
    let tagged_file = Probe::open(path)
        .context("Failed to open file for writing")?
        .guess_file_type()
        .context("Failed to detect file type")?
        .options(parse_options())
        .read()
        .context("Failed to read file for tag writing")?;

    let tag_type = tagged_file.primary_tag_type();
    let stale: Vec<TagType> = tagged_file
        .tags()
        .iter()
        .map(|t| t.tag_type())
        .filter(|t| *t != tag_type)
        .collect();

    let mut tag = Tag::new(tag_type);
    let mut fields_written = apply_record(&mut tag, record);

    let cover_embedded = match cover {
        Some(art) => {
            tag.push_picture(front_cover_picture(art));
            true
        }
        None => false,
    };

    let options = WriteOptions::default().use_id3v23(true);
    if tag_type == TagType::Id3v2 {
        // v2.3 has no TDRC; only a timestamp frame is split into TYER/TDAT on save
        let mut id3 = Id3v2Tag::from(tag);
        if let Some(timestamp) = record_timestamp(record) {
            id3.insert(Frame::Timestamp(TimestampFrame::new(
                FrameId::Valid(Cow::Borrowed("TDRC")),
                TextEncoding::UTF8,
                timestamp,
            )));
            fields_written += 1;
        }
        id3.save_to_path(path, options)
            .context("Failed to write tags to file")?;
    } else {
        if apply_date(&mut tag, record) {
            fields_written += 1;
        }
        tag.save_to_path(path, options)
            .context("Failed to write tags to file")?;
    }

    let mut removed_tags = Vec::new();
    for tag_type in stale {
        match tag_type.remove_from_path(path) {
            Ok(()) => removed_tags.push(tag_type),
            Err(e) => tracing::warn!("Could not remove {:?} tag from {:?}: {}", tag_type, path, e),
        }
    }

    Ok(WriteResult {
        fields_written,
        cover_embedded,
        removed_tags,
    })
}

/// Assign every present field of `record` except the date; returns how many were set.
fn apply_record(tag: &mut Tag, record: &TagRecord) -> usize {
    let mut written = 0;

    tag.set_title(record.title.clone());
    tag.set_artist(record.artist.clone());
    written += 2;

    if tag.insert_text(ItemKey::AlbumArtist, record.album_artist.clone()) {
        written += 1;
    }

    if let Some(ref album) = record.album {
        tag.set_album(album.clone());
        written += 1;
    }

    if let Some(ref genre) = record.genre {
        tag.set_genre(genre.clone());
        written += 1;
    }

    written
}

/// Full release date when it parses, otherwise the bare year.
fn record_timestamp(record: &TagRecord) -> Option<Timestamp> {
    if let Some(timestamp) = record
        .release_date
        .as_deref()
        .and_then(|date| date.parse::<Timestamp>().ok())
    {
        return Some(timestamp);
    }

    let year = record.year.as_deref()?.parse::<u16>().ok()?;
    Some(Timestamp {
        year,
        ..Timestamp::default()
    })
}

/// Date for non-ID3v2 tag types, where the generic item maps directly.
fn apply_date(tag: &mut Tag, record: &TagRecord) -> bool {
    match record_timestamp(record) {
        Some(timestamp) => tag.insert_text(ItemKey::RecordingDate, timestamp.to_string()),
        None => false,
    }
}

fn front_cover_picture(art: &CoverArt) -> Picture {
    // ID3v2.3 readers reject an APIC frame whose description is absent
    Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::from_str(&art.mime_type)),
        Some(String::new()),
        art.data.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{read_primary_tag, sample_cover, write_silent_mp3, write_tagged_mp3};
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn record() -> TagRecord {
        TagRecord {
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            album_artist: "Artist".to_string(),
            album: Some("LP".to_string()),
            genre: Some("Rock".to_string()),
            release_date: Some("2020-05-01".to_string()),
            year: Some("2020".to_string()),
            cover_art_url: None,
        }
    }

    #[test]
    fn test_untagged_mp3_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        assert!(tags_empty(&path));
    }

    #[test]
    fn test_any_core_field_makes_file_non_empty() {
        let dir = tempdir().unwrap();

        let titled = dir.path().join("titled.mp3");
        write_tagged_mp3(&titled, Some("Title"), None, None);
        assert!(!tags_empty(&titled));

        let album_only = dir.path().join("album.mp3");
        write_tagged_mp3(&album_only, None, None, Some("Album"));
        assert!(!tags_empty(&album_only));
    }

    #[test]
    fn test_other_fields_do_not_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genre_only.mp3");
        write_silent_mp3(&path);

        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_genre("Jazz".to_string());
        tag.save_to_path(&path, WriteOptions::default()).unwrap();

        assert!(tags_empty(&path));
    }

    #[test]
    fn test_non_audio_and_missing_files_count_as_empty() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").unwrap();

        assert!(tags_empty(file.path()));
        assert!(tags_empty(Path::new("non_existent_file.mp3")));
    }

    #[test]
    fn test_write_tags_sets_all_fields_and_cover() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let cover = sample_cover();
        let result = write_tags(&path, &record(), Some(&cover)).unwrap();
        assert!(result.cover_embedded);
        assert_eq!(result.fields_written, 6);
        assert!(!tags_empty(&path));

        let tag = read_primary_tag(&path);
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert_eq!(tag.artist().as_deref(), Some("Artist"));
        assert_eq!(tag.album().as_deref(), Some("LP"));
        assert_eq!(tag.genre().as_deref(), Some("Rock"));
        assert_eq!(tag.get_string(&ItemKey::AlbumArtist), Some("Artist"));
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), Some("2020-05-01"));
        assert_eq!(tag.year(), Some(2020));

        let pictures = tag.pictures();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].pic_type(), PictureType::CoverFront);
        assert_eq!(pictures[0].mime_type(), Some(&MimeType::Jpeg));
        assert_eq!(pictures[0].data(), cover.data.as_slice());
    }

    #[test]
    fn test_written_file_rereads_with_default_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        write_tags(&path, &record(), Some(&sample_cover())).unwrap();

        let tagged_file = Probe::open(&path).unwrap().read().unwrap();
        let id3 = tagged_file.tag(TagType::Id3v2).expect("ID3v2 tag present");
        assert_eq!(id3.title().as_deref(), Some("Song"));
        assert_eq!(id3.pictures().len(), 1);
    }

    #[test]
    fn test_year_only_record_writes_year() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let year_only = TagRecord {
            release_date: None,
            ..record()
        };
        let result = write_tags(&path, &year_only, None).unwrap();
        assert_eq!(result.fields_written, 6);

        let tag = read_primary_tag(&path);
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), Some("2020"));
        assert_eq!(tag.year(), Some(2020));
    }

    #[test]
    fn test_unparseable_date_falls_back_to_year() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let odd = TagRecord {
            release_date: Some("someday".to_string()),
            ..record()
        };
        write_tags(&path, &odd, None).unwrap();

        assert_eq!(read_primary_tag(&path).year(), Some(2020));
    }

    #[test]
    fn test_partial_download_name_is_read_and_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.mp3.part");
        write_tagged_mp3(&path, Some("Old"), None, None);
        assert!(!tags_empty(&path));

        let result = write_tags(&path, &record(), None).unwrap();
        assert_eq!(result.fields_written, 6);

        let tag = read_primary_tag(&path);
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), Some("2020-05-01"));
    }

    #[test]
    fn test_write_tags_without_album_or_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let sparse = TagRecord {
            album: None,
            release_date: None,
            year: None,
            genre: None,
            ..record()
        };
        let result = write_tags(&path, &sparse, None).unwrap();
        assert!(!result.cover_embedded);
        assert_eq!(result.fields_written, 3);

        let tag = read_primary_tag(&path);
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert_eq!(tag.artist().as_deref(), Some("Artist"));
        assert!(tag.album().is_none());
        assert!(tag.genre().is_none());
        assert!(tag.get_string(&ItemKey::RecordingDate).is_none());
        assert!(tag.pictures().is_empty());
    }

    #[test]
    fn test_write_tags_clears_previous_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let mut old = Tag::new(TagType::Id3v2);
        old.set_title("Old".to_string());
        old.set_comment("leftover".to_string());
        old.save_to_path(&path, WriteOptions::default()).unwrap();

        write_tags(&path, &record(), None).unwrap();

        let tag = read_primary_tag(&path);
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert!(tag.comment().is_none());
    }

    #[test]
    fn test_write_tags_strips_id3v1() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let mut v1 = Tag::new(TagType::Id3v1);
        v1.set_title("Old".to_string());
        v1.save_to_path(&path, WriteOptions::default()).unwrap();

        let result = write_tags(&path, &record(), None).unwrap();
        assert_eq!(result.removed_tags, vec![TagType::Id3v1]);

        let tagged_file = Probe::open(&path).unwrap().read().unwrap();
        assert!(tagged_file.tag(TagType::Id3v1).is_none());
    }

    #[test]
    fn test_write_tags_on_non_audio_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Not an audio file").unwrap();

        assert!(write_tags(file.path(), &record(), None).is_err());
    }
}
