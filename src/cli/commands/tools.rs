//! External tool checks.

use std::path::Path;

use crate::config::{self, Settings};
use crate::recognition::SignatureGenerator;

/// Check if the signature generator is installed
pub fn cmd_check_tools(settings: &Settings, config_override: Option<&Path>) -> anyhow::Result<()> {
    println!("Checking recognition tools...\n");

    let generator = SignatureGenerator::new(&settings.signature);
    match generator.version() {
        Some(version) => println!("✓ {}: {}", generator.program(), version),
        None => {
            println!("✗ {}: NOT FOUND", generator.program());
            print_generator_install_instructions();
        }
    }

    println!();
    println!("Settings:");
    match config_override.map(Path::to_path_buf).or_else(config::config_path) {
        Some(path) if path.exists() => println!("✓ {}", path.display()),
        Some(path) => println!("- {} (not present, using defaults)", path.display()),
        None => println!("✗ could not determine the config directory"),
    }
    println!("  Recognition endpoint: {}", settings.service.recognize_url);

    Ok(())
}

fn print_generator_install_instructions() {
    println!("Install SongRec (provides `songrec audio-file-to-fingerprint`):");
    println!("  Linux:   apt install songrec  (or flatpak install com.github.marinm.songrec)");
    println!("  Any:     cargo install songrec");
    println!("Or point [signature] program/args in config.toml at another generator.");
}
