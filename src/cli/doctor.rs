//! CLI `doctor` command: check both snapshot files and print a health report.

use anyhow::Result;

use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::snapshot::{self, CURRENT_SNAPSHOT_VERSION};

/// Inspect both snapshot files without modifying them.
pub fn doctor(config: &RecollectConfig) -> Result<()> {
    println!("Recollect Health Report");
    println!("=======================");

    let mut unreadable = Vec::new();

    for kind in [StoreKind::Memory, StoreKind::Knowledge] {
        let path = config.snapshot_path(kind);
        let health = snapshot::check_snapshot_health(&path, kind);

        println!();
        println!("{kind} store:");
        println!("  Snapshot:        {}", path.display());

        if !health.exists {
            match kind {
                StoreKind::Memory => println!("  Status:          not created yet (starts empty)"),
                StoreKind::Knowledge => println!("  Status:          not created yet (seeded on first open)"),
            }
            continue;
        }

        println!("  File size:       {}", format_bytes(health.size_bytes));
        match health.version {
            Some(v) if v < CURRENT_SNAPSHOT_VERSION => {
                println!("  Format version:  {v} (upgraded on next write)")
            }
            Some(v) => println!("  Format version:  {v}"),
            None => println!("  Format version:  unknown"),
        }

        if health.readable {
            println!("  Records:         {}", health.record_count.unwrap_or(0));
            println!("  Status:          OK");
        } else {
            println!(
                "  Status:          UNREADABLE ({})",
                health.error.as_deref().unwrap_or("unknown error")
            );
            unreadable.push(kind);
        }
    }

    if !unreadable.is_empty() {
        println!();
        println!("Recovery steps:");
        println!("  The store opens cold while its snapshot is unreadable; the next write overwrites it.");
        println!("  1. Move the file aside to keep it: mv <snapshot> <snapshot>.bak");
        println!("  2. Repair it by hand and reimport:");
        for kind in unreadable {
            println!("     recollect import --store {kind} <repaired.json>");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
