pub mod add_knowledge;
pub mod memory_stats;
pub mod recall_memory;
pub mod store_memory;

use add_knowledge::AddKnowledgeParams;
use memory_stats::MemoryStatsParams;
use recall_memory::RecallMemoryParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::{Arc, Mutex};
use store_memory::StoreMemoryParams;

use recollect::memory::store::USER_STATEMENT;
use recollect::memory::types::StoreKind;
use recollect::memory::Store;

/// Upper bound on `max_results` accepted from clients.
const MAX_RESULTS_LIMIT: usize = 20;

/// The Recollect MCP tool handler. Holds both stores behind their own locks
/// and exposes all MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct RecollectTools {
    tool_router: ToolRouter<Self>,
    memory: Arc<Mutex<Store>>,
    knowledge: Arc<Mutex<Store>>,
}

#[tool_router]
impl RecollectTools {
    pub fn new(memory: Arc<Mutex<Store>>, knowledge: Arc<Mutex<Store>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            memory,
            knowledge,
        }
    }

    fn store_for(&self, name: Option<&str>) -> Result<(StoreKind, Arc<Mutex<Store>>), String> {
        let kind = match name {
            Some(name) => name.parse::<StoreKind>()?,
            None => StoreKind::Memory,
        };
        let store = match kind {
            StoreKind::Memory => Arc::clone(&self.memory),
            StoreKind::Knowledge => Arc::clone(&self.knowledge),
        };
        Ok((kind, store))
    }

    /// Store a personal memory.
    #[tool(description = "Store a personal memory (facts about the user, preferences, work). Importance and category are computed from the content. Low-retention memories are evicted once the store exceeds its capacity.")]
    async fn store_memory(
        &self,
        Parameters(params): Parameters<StoreMemoryParams>,
    ) -> Result<String, String> {
        if params.content.trim().is_empty() {
            return Err("content must not be empty".into());
        }
        if let Some(importance) = params.importance {
            if !(0.0..=1.0).contains(&importance) {
                return Err("importance must be between 0.0 and 1.0".into());
            }
        }

        tracing::info!(
            content_len = params.content.len(),
            only_if_triggered = params.only_if_triggered.unwrap_or(false),
            "store_memory called"
        );

        let memory = Arc::clone(&self.memory);
        let result = tokio::task::spawn_blocking(move || {
            let mut store = memory
                .lock()
                .map_err(|e| format!("memory store lock poisoned: {e}"))?;
            let outcome = if params.only_if_triggered.unwrap_or(false) {
                store.observe(&params.content)
            } else {
                let provenance = params.provenance.as_deref().unwrap_or(USER_STATEMENT);
                store
                    .insert(&params.content, provenance, params.importance)
                    .map(Some)
            };
            outcome.map_err(|e| format!("store failed: {e}"))
        })
        .await
        .map_err(|e| format!("store task failed: {e}"))??;

        match result {
            Some(result) => {
                tracing::info!(id = %result.id, evicted = result.evicted, "memory stored");
                serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
            }
            None => Ok(serde_json::json!({
                "stored": false,
                "message": "no storage trigger found in content"
            })
            .to_string()),
        }
    }

    /// Retrieve the most relevant records for a query.
    #[tool(description = "Search personal memories or the knowledge base by natural language query. Returns up to max_results records ranked by TF-IDF cosine similarity; weak matches below the store's relevance floor are dropped.")]
    async fn recall_memory(
        &self,
        Parameters(params): Parameters<RecallMemoryParams>,
    ) -> Result<String, String> {
        let (kind, store) = self.store_for(params.store.as_deref())?;
        let max_results = params.max_results.map(|k| k.clamp(1, MAX_RESULTS_LIMIT));

        tracing::info!(store = %kind, query_len = params.query.len(), "recall_memory called");

        let response = tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|e| format!("{kind} store lock poisoned: {e}"))?;
            Ok::<_, String>(match max_results {
                Some(k) => store.retrieve(&params.query, k),
                None => store.retrieve_default(&params.query),
            })
        })
        .await
        .map_err(|e| format!("recall task failed: {e}"))??;

        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Add a curated document to the knowledge base.
    #[tool(description = "Add a curated document to the knowledge base, with optional title, category and tags. The category is inferred from the text when omitted.")]
    async fn add_knowledge(
        &self,
        Parameters(params): Parameters<AddKnowledgeParams>,
    ) -> Result<String, String> {
        if params.content.trim().is_empty() {
            return Err("content must not be empty".into());
        }

        tracing::info!(
            content_len = params.content.len(),
            title = params.title.as_deref().unwrap_or(""),
            "add_knowledge called"
        );

        let knowledge = Arc::clone(&self.knowledge);
        let result = tokio::task::spawn_blocking(move || {
            let mut store = knowledge
                .lock()
                .map_err(|e| format!("knowledge store lock poisoned: {e}"))?;
            store
                .add_explicit(
                    params.title.as_deref(),
                    &params.content,
                    params.category.as_deref(),
                    params.tags.unwrap_or_default(),
                )
                .map_err(|e| format!("add failed: {e}"))
        })
        .await
        .map_err(|e| format!("add task failed: {e}"))??;

        tracing::info!(id = %result.id, category = %result.category, "knowledge added");
        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Get statistics about a store.
    #[tool(description = "Get store statistics: record counts by category, average importance and length, vocabulary size, vector dimensions.")]
    async fn memory_stats(
        &self,
        Parameters(params): Parameters<MemoryStatsParams>,
    ) -> Result<String, String> {
        let (kind, store) = self.store_for(params.store.as_deref())?;
        tracing::info!(store = %kind, "memory_stats called");

        let response = tokio::task::spawn_blocking(move || {
            let store = store
                .lock()
                .map_err(|e| format!("{kind} store lock poisoned: {e}"))?;
            Ok::<_, String>(store.stats())
        })
        .await
        .map_err(|e| format!("stats task failed: {e}"))??;

        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for RecollectTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Recollect is a semantic memory server. Use store_memory to save personal \
                 memories, add_knowledge to curate documents, recall_memory to search either \
                 store, and memory_stats for an overview."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
