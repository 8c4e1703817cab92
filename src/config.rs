//! Run configuration and the settings file.
//!
//! Two layers:
//! - [`RunConfig`]: what to scan and how to confirm, built once from the
//!   command line and passed by reference to every component.
//! - [`Settings`]: service endpoints, network tunables and the signature
//!   generator command, read from a TOML file in the OS config directory:
//!   - Windows: %APPDATA%\song-id\config.toml
//!   - macOS: ~/Library/Application Support/song-id/config.toml
//!   - Linux: ~/.config/song-id/config.toml
//!
//! A missing or broken settings file is never fatal; defaults are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Run Configuration
// ============================================================================

/// What a single run processes. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Descend into sub-directories
    pub recursive: bool,
    /// Only process files whose title/artist/album are all unset
    pub empty_only: bool,
    /// Write tags without asking
    pub auto_accept: bool,
}

impl RunConfig {
    /// Configuration for `root` with the default flags: non-recursive,
    /// empty-only, confirmation required.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            empty_only: true,
            auto_accept: false,
        }
    }
}

/// The platform music directory, falling back to `~/Music`.
pub fn default_music_dir() -> Result<PathBuf> {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .ok_or_else(|| Error::config("could not determine the default music directory"))
}

// ============================================================================
// Settings File
// ============================================================================

/// Tunables read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recognition service endpoints and locale
    pub service: ServiceConfig,

    /// Timeouts and retry policy for every HTTP call
    pub network: NetworkConfig,

    /// External signature generator
    pub signature: SignatureConfig,
}

/// Recognition service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the recognition (tag) endpoint
    pub recognize_url: String,
    /// Base URL of the track details endpoint
    pub details_url: String,
    /// Language segment of the request path
    pub language: String,
    /// Country segment of the request path
    pub country: String,
    /// Device segment of the recognition request path
    pub device: String,
    /// Timezone reported with each recognition request
    pub timezone: String,
    /// Resolution token present in low-resolution cover URLs
    pub cover_low_res_token: String,
    /// Replacement token for the high-resolution variant
    pub cover_high_res_token: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            recognize_url: "https://amp.shazam.com".to_string(),
            details_url: "https://www.shazam.com".to_string(),
            language: "en".to_string(),
            country: "US".to_string(),
            device: "iphone".to_string(),
            timezone: "UTC".to_string(),
            cover_low_res_token: "400x400".to_string(),
            cover_high_res_token: "1000x1000".to_string(),
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure (0 = no retries)
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt
    pub retry_backoff_ms: u64,
    /// Pause between files
    pub pause_between_files_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_retries: 2,
            retry_backoff_ms: 500,
            pause_between_files_ms: 0,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn pause_between_files(&self) -> Duration {
        Duration::from_millis(self.pause_between_files_ms)
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(10);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

/// Signature generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Program to run; the audio path is appended to `args`
    pub program: String,
    /// Arguments placed before the audio path
    pub args: Vec<String>,
    /// Sample length sent when the generator prints a bare data URI
    pub default_sample_ms: u64,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            program: "songrec".to_string(),
            args: vec!["audio-file-to-fingerprint".to_string()],
            default_sample_ms: 12_000,
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("song-id"))
}

/// Get the full path to the default settings file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// Returns defaults if the file doesn't exist or can't be parsed.
pub fn load(path: Option<&Path>) -> Settings {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => p,
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                return Settings::default();
            }
        },
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match parse(&contents) {
            Ok(settings) => {
                tracing::info!("Loaded config from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Settings::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Parse settings from TOML text.
pub fn parse(contents: &str) -> std::result::Result<Settings, toml::de::Error> {
    toml::from_str(contents)
}
