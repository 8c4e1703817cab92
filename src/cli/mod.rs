//! Command-line interface for song-id.
//!
//! This module parses the permissive option set and runs the batch tagger
//! or the tool check.

mod commands;

pub use commands::{Cli, normalize_args, run_command};
