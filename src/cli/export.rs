use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;
use recollect::snapshot;

/// Export every record of a store as a snapshot document to stdout.
pub fn export(config: &RecollectConfig, kind: StoreKind) -> Result<()> {
    let store = Store::open(config, kind)?;

    let json = snapshot::to_json(kind, store.records())?;
    println!("{json}");

    eprintln!("Exported {} {kind} record(s).", store.len());
    Ok(())
}
