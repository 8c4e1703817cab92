//! Song ID - identifies MP3 files with Shazam and writes their tags.
//!
//! Scans a directory for MP3 files (by default only untagged ones), asks the
//! recognition service what each one is, shows the match and, once
//! confirmed, rewrites the file's tags and embeds the cover art.

pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod metadata;
pub mod net;
pub mod recognition;
pub mod scanner;
pub mod tagger;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the per-file report
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("song_id=info")))
        .init();

    let args = cli::Cli::parse_from(cli::normalize_args(std::env::args()));
    cli::run_command(&args)
}
