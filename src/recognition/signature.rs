//! Audio signature generation via an external program
//!
//! Signature generation is not done in-process. We shell out to a configured
//! generator (by default `songrec`) and read the signature from its stdout.
//! Two output forms are accepted:
//! - JSON: `{"uri": "data:audio/vnd.shazam.sig;base64,...", "samplems": 11960}`
//! - a bare `data:` URI on a single line (sample length taken from settings)

use std::path::Path;
use std::process::Command;

use crate::config::SignatureConfig;
use crate::recognition::domain::{RecognitionError, Signature};

/// Runs the configured signature generator
#[derive(Debug, Clone)]
pub struct SignatureGenerator {
    program: String,
    args: Vec<String>,
    default_sample_ms: u64,
}

impl SignatureGenerator {
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            default_sample_ms: config.default_sample_ms,
        }
    }

    /// Name of the program that will be run
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Generate a signature for the given file
    pub fn generate(&self, path: &Path) -> Result<Signature, RecognitionError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                RecognitionError::Signature(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Signature(format!(
                "{} failed: {}",
                self.program,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_generator_output(&stdout, self.default_sample_ms)
    }

    /// Check if the generator can be started at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Generator version string (for diagnostics)
    pub fn version(&self) -> Option<String> {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    }
}

/// Generator JSON output structure
#[derive(serde::Deserialize)]
struct GeneratorOutput {
    uri: String,
    samplems: Option<u64>,
}

/// Parse generator stdout into a [`Signature`]
fn parse_generator_output(stdout: &str, default_sample_ms: u64) -> Result<Signature, RecognitionError> {
    let trimmed = stdout.trim();

    if trimmed.starts_with("data:") {
        return Ok(Signature {
            uri: trimmed.to_string(),
            sample_ms: default_sample_ms,
        });
    }

    let parsed: GeneratorOutput = serde_json::from_str(trimmed).map_err(|e| {
        RecognitionError::Signature(format!("Failed to parse generator output: {}", e))
    })?;

    if !parsed.uri.starts_with("data:") {
        return Err(RecognitionError::Signature(
            "generator output is not a data URI".to_string(),
        ));
    }

    Ok(Signature {
        uri: parsed.uri,
        sample_ms: parsed.samplems.unwrap_or(default_sample_ms),
    })
}
