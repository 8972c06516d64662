use anyhow::{Context, Result};
use std::path::Path;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;
use recollect::snapshot;

/// Import records from a snapshot file (current or legacy format).
///
/// Records keep their ids, timestamps, and access statistics. Records whose
/// id already exists in the store are skipped. Capacity is enforced once,
/// after the whole batch.
pub fn import(config: &RecollectConfig, kind: StoreKind, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;
    let records = snapshot::parse(&json, kind, file).context("failed to parse import file")?;

    let mut store = Store::open(config, kind)?;
    println!("Importing {} {kind} record(s)...", records.len());
    let result = store.import(records)?;

    println!("Import complete:");
    println!("  Imported:  {}", result.imported);
    println!("  Skipped:   {} (already exist)", result.skipped);
    if result.evicted > 0 {
        println!("  Evicted:   {} (capacity reached)", result.evicted);
    }
    if !result.persisted {
        println!("  WARNING: snapshot write failed; import is not on disk.");
    }

    Ok(())
}
