//! CLI `remember` and `learn` commands: one-shot inserts from the terminal.

use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::store::InsertResult;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Store a personal memory, optionally only when a trigger phrase is present.
pub fn remember(
    config: &RecollectConfig,
    content: &str,
    provenance: &str,
    importance: Option<f64>,
    if_triggered: bool,
) -> Result<()> {
    let mut store = Store::open(config, StoreKind::Memory)?;

    let result = if if_triggered {
        match store.observe(content)? {
            Some(result) => result,
            None => {
                println!("No storage trigger found; nothing stored.");
                return Ok(());
            }
        }
    } else {
        store.insert(content, provenance, importance)?
    };

    print_insert(&result, store.len());
    Ok(())
}

/// Add a curated document to the knowledge store.
pub fn learn(
    config: &RecollectConfig,
    title: Option<&str>,
    content: &str,
    category: Option<&str>,
    tags: Vec<String>,
) -> Result<()> {
    let mut store = Store::open(config, StoreKind::Knowledge)?;
    let result = store.add_explicit(title, content, category, tags)?;
    print_insert(&result, store.len());
    Ok(())
}

fn print_insert(result: &InsertResult, total: usize) {
    println!("Stored {}", result.id);
    println!("  Category:    {}", result.category);
    println!("  Importance:  {:.2}", result.importance);
    println!("  Records:     {total}");
    if result.evicted > 0 {
        println!("  Evicted:     {} (capacity reached)", result.evicted);
    }
    if !result.persisted {
        println!("  WARNING: snapshot write failed; this record is not on disk.");
    }
}
