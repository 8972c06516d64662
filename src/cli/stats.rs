use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Display store statistics in the terminal.
pub fn stats(config: &RecollectConfig, kind: StoreKind) -> Result<()> {
    let store = Store::open(config, kind)?;
    let response = store.stats();

    println!("{} Statistics", capitalize(kind.as_str()));
    println!("{}", "=".repeat(40));
    println!("  Total records:       {}", response.total_records);
    if let Some(capacity) = store.profile().capacity {
        println!("  Capacity:            {capacity}");
    }
    println!("  Avg importance:      {:.3}", response.average_importance);
    println!("  Avg length (chars):  {:.1}", response.average_content_length);
    println!("  Vocabulary size:     {}", response.vocabulary_size);
    println!("  Vector dimensions:   {}", response.vector_dimensions);
    println!();

    if !response.by_category.is_empty() {
        println!("  By category:");
        for (category, count) in &response.by_category {
            println!("    {category:<18} {count}");
        }
        println!();
    }

    if let (Some(oldest), Some(newest)) = (response.oldest_record, response.newest_record) {
        println!("  Oldest:              {}", oldest.format("%Y-%m-%d %H:%M"));
        println!("  Newest:              {}", newest.format("%Y-%m-%d %H:%M"));
    }
    println!("  Snapshot:            {}", store.snapshot_path().display());

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
