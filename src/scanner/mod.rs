//! Candidate file collection.
//!
//! Walks the run's root directory (one level, or the whole tree when
//! recursive) and keeps files carrying the target extension. With
//! `empty_only`, files that already have a title, artist or album are dropped.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::{Error, Result, ResultExt};
use crate::metadata;

/// Extension of the files we tag
pub const TARGET_EXTENSION: &str = "mp3";

/// Collect the files a run should process, in walk order.
///
/// Fails when the root is not a directory or cannot be listed. Entries
/// deeper in the tree that cannot be read are logged and skipped.
pub fn collect_candidates(config: &RunConfig) -> Result<Vec<PathBuf>> {
    let root = &config.root;
    if !root.is_dir() {
        return Err(Error::invalid_directory(root));
    }
    std::fs::read_dir(root).with_context(format!("listing {}", root.display()))?;

    let walker = if config.recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker.min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !has_target_extension(path, TARGET_EXTENSION) {
            continue;
        }

        if config.empty_only && !metadata::tags_empty(path) {
            tracing::debug!("Already tagged, skipping {:?}", path);
            continue;
        }

        tracing::debug!("Candidate: {}", path.display());
        files.push(path.to_path_buf());
    }

    tracing::info!("Found {} candidate files in {}", files.len(), root.display());
    Ok(files)
}

/// True when one of the file name's dot suffixes equals `extension`
/// (case-insensitive).
///
/// `song.mp3`, `song.MP3` and `song.mp3.part` match `mp3`; `song.mp33`,
/// `mp3` and the dotfile `.mp3` do not.
pub fn has_target_extension(path: &Path, extension: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with('.') {
        return false;
    }

    name.trim_start_matches('.')
        .split('.')
        .skip(1)
        .any(|suffix| suffix.eq_ignore_ascii_case(extension))
}
