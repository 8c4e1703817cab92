//! CLI argument model and dispatch.
//!
//! The accepted tokens are a fixed, permissive set: `-d/--directory <DIR>`,
//! `-r/--recursive`, `-a/--all`, `-au/--autoaccept`, `-h/--help`, plus
//! `--config <PATH>` and `--check-tools`. Anything else is ignored, so
//! [`normalize_args`] rewrites the raw command line into a form clap parses
//! strictly.
//!
//! Each command lives in its own submodule:
//! - `tag`: Recognize and tag a directory of files
//! - `tools`: Report on the external signature generator

mod tag;
mod tools;

use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::{self, RunConfig};

pub use tag::cmd_tag;
pub use tools::cmd_check_tools;

/// Identify songs with Shazam and write their tags
#[derive(Parser, Debug)]
#[command(name = "song-id", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for MP3 files (default: the platform Music folder)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Scan the directory recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Process every MP3 file, not just those without tags
    #[arg(short, long)]
    pub all: bool,

    /// Write tags without asking (also accepted as -au)
    #[arg(long)]
    pub autoaccept: bool,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH", env = "SONG_ID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check that the signature generator is installed and exit
    #[arg(long)]
    pub check_tools: bool,
}

/// Reduce a raw command line to the tokens [`Cli`] understands.
///
/// The first token (program name) is kept. Known flags are mapped to their
/// long form, `-au` included; an option's value is glued on with `=` so a
/// value starting with `-` survives. An option with no value after it and
/// every unknown token are dropped. The first occurrence of an option wins.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut out: Vec<String> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => push_once(&mut out, "--help".to_string()),
            "-r" | "--recursive" => push_once(&mut out, "--recursive".to_string()),
            "-a" | "--all" => push_once(&mut out, "--all".to_string()),
            "-au" | "--autoaccept" => push_once(&mut out, "--autoaccept".to_string()),
            "--check-tools" => push_once(&mut out, "--check-tools".to_string()),
            "-d" | "--directory" | "--config" => {
                let long = if arg == "--config" { "--config" } else { "--directory" };
                if let Some(value) = args.next() {
                    push_once(&mut out, format!("{long}={value}"));
                }
            }
            other if other.starts_with("--directory=") || other.starts_with("--config=") => {
                push_once(&mut out, other.to_string())
            }
            other => tracing::debug!("Ignoring argument {:?}", other),
        }
    }

    out
}

/// Append `token` unless an option of the same name is already present.
fn push_once(out: &mut Vec<String>, token: String) {
    let name = option_name(&token);
    if !out.iter().skip(1).any(|t| option_name(t) == name) {
        out.push(token);
    }
}

fn option_name(token: &str) -> &str {
    token.split('=').next().unwrap_or(token)
}

/// Run the command selected by `cli`.
///
/// An unusable directory, given or default, prints "Invalid directory" and
/// the usage text and returns normally.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let settings = config::load(cli.config.as_deref());

    if cli.check_tools {
        return cmd_check_tools(&settings, cli.config.as_deref());
    }

    let Some(root) = resolve_root(cli.directory.as_deref()) else {
        println!("Invalid directory");
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let run = RunConfig {
        recursive: cli.recursive,
        empty_only: !cli.all,
        auto_accept: cli.autoaccept,
        ..RunConfig::new(root)
    };

    let rt = Runtime::new()?;
    cmd_tag(&rt, &run, &settings)
}

/// The directory to scan: the given one, else the platform Music folder.
/// `None` when it cannot be determined or is not a directory.
fn resolve_root(directory: Option<&Path>) -> Option<PathBuf> {
    let root = match directory {
        Some(dir) => dir.to_path_buf(),
        None => match config::default_music_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("{}", e);
                return None;
            }
        },
    };

    root.is_dir().then_some(root)
}
