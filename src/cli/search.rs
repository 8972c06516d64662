use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Run a retrieval from the terminal.
pub fn recall(
    config: &RecollectConfig,
    kind: StoreKind,
    query: &str,
    k: Option<usize>,
) -> Result<()> {
    let mut store = Store::open(config, kind)?;
    let response = match k {
        Some(k) => store.retrieve(query, k),
        None => store.retrieve_default(query),
    };

    if let Some(warning) = &response.warning {
        println!("Warning: {warning}");
    }
    if response.results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!(
        "Found {} result(s) among {} {} record(s)\n",
        response.results.len(),
        response.total_scored,
        kind
    );

    for (i, result) in response.results.iter().enumerate() {
        let preview: String = if result.content.chars().count() > 120 {
            let head: String = result.content.chars().take(120).collect();
            format!("{head}...")
        } else {
            result.content.clone()
        };

        println!(
            "  {}. [{}] {} (importance: {:.2}, similarity: {:.4})",
            i + 1,
            result.category,
            result.id,
            result.importance,
            result.similarity,
        );
        if let Some(title) = &result.title {
            println!("     {title}");
        }
        println!("     {preview}");
        println!();
    }

    Ok(())
}
