//! CLI `reset` command: delete a store's snapshot after user confirmation.

use anyhow::{bail, Context, Result};
use std::io::Write;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;

/// Delete a store's snapshot after user confirmation.
///
/// The next open is a cold start: an empty memory store, or a freshly seeded
/// knowledge store.
pub fn reset(config: &RecollectConfig, kind: StoreKind) -> Result<()> {
    let path = config.snapshot_path(kind);

    if !path.exists() {
        println!("No {kind} snapshot at {}; nothing to reset.", path.display());
        return Ok(());
    }

    println!("WARNING: This will permanently delete ALL {kind} records.");
    println!("Snapshot: {}", path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    std::fs::remove_file(&path)
        .with_context(|| format!("failed to delete snapshot: {}", path.display()))?;

    println!("The {kind} store has been reset.");
    Ok(())
}
