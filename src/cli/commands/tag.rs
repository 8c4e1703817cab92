//! Batch recognize-and-tag command.

use tokio::runtime::Runtime;

use crate::config::{RunConfig, Settings};
use crate::cover::HttpArtFetcher;
use crate::recognition::{CoverTokens, ShazamClient, SignatureGenerator};
use crate::scanner;
use crate::tagger::{AutoAccept, BatchSummary, Tagger, TerminalPrompt};

/// Recognize every candidate under `run.root` and write its tags
pub fn cmd_tag(rt: &Runtime, run: &RunConfig, settings: &Settings) -> anyhow::Result<()> {
    println!("Scanning {}...", run.root.display());
    let files = scanner::collect_candidates(run)?;

    if files.is_empty() {
        println!("No files to process.");
        return Ok(());
    }
    println!("Found {} files to process\n", files.len());

    let signatures = SignatureGenerator::new(&settings.signature);
    if !signatures.is_available() {
        tracing::warn!(
            "Signature generator {:?} did not respond; run with --check-tools for details",
            signatures.program()
        );
    }

    let client = ShazamClient::new(
        settings.service.clone(),
        settings.network.clone(),
        signatures,
    )?;
    let art = HttpArtFetcher::new(settings.network.clone())?;
    let tagger = Tagger::new(&client, &art, CoverTokens::from_service(&settings.service))
        .with_pause(settings.network.pause_between_files());

    let summary = rt.block_on(async {
        if run.auto_accept {
            tagger.run(&files, &mut AutoAccept).await
        } else {
            tagger.run(&files, &mut TerminalPrompt).await
        }
    });

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!("═══════════════════════════════════════");
    println!("Processed {} files:", summary.total());
    println!("  ✓ Written:  {}", summary.written);
    println!("  - Declined: {}", summary.declined);
    println!("  ? No match: {}", summary.no_match);
    println!("  ✗ Failed:   {}", summary.failed);
}
