//! MCP server initialization for the stdio transport.
//!
//! [`serve_stdio`] opens both stores and wires them into the MCP tool handler.

use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

use crate::tools::RecollectTools;
use recollect::config::RecollectConfig;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Open both stores, each behind its own lock.
fn setup_shared_state(config: &RecollectConfig) -> Result<(Arc<Mutex<Store>>, Arc<Mutex<Store>>)> {
    let memory = Store::open(config, StoreKind::Memory)?;
    tracing::info!(
        records = memory.len(),
        snapshot = %memory.snapshot_path().display(),
        "memory store ready"
    );

    let knowledge = Store::open(config, StoreKind::Knowledge)?;
    tracing::info!(
        records = knowledge.len(),
        snapshot = %knowledge.snapshot_path().display(),
        "knowledge store ready"
    );

    Ok((Arc::new(Mutex::new(memory)), Arc::new(Mutex::new(knowledge))))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: RecollectConfig) -> Result<()> {
    tracing::info!("starting Recollect MCP server on stdio");

    // Index builds are CPU-bound; keep them off the async runtime.
    let (memory, knowledge) =
        tokio::task::spawn_blocking(move || setup_shared_state(&config)).await??;

    let tools = RecollectTools::new(memory, knowledge);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
