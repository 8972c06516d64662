use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Prune a store to its capacity by retention score.
pub fn evict(config: &RecollectConfig, kind: StoreKind) -> Result<()> {
    let mut store = Store::open(config, kind)?;

    let Some(capacity) = store.profile().capacity else {
        println!("The {kind} store has no capacity bound; nothing to evict.");
        return Ok(());
    };

    println!("Running eviction on the {kind} store (capacity {capacity})...");
    let result = store.enforce_capacity();

    println!("  Evicted:    {}", result.evicted.len());
    for id in &result.evicted {
        println!("    - {id}");
    }
    println!("  Remaining:  {}", result.remaining);
    if !result.persisted {
        println!("  WARNING: snapshot write failed; eviction is not on disk.");
    }
    println!("Eviction complete.");

    Ok(())
}
