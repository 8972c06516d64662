//! MCP `recall_memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `recall_memory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecallMemoryParams {
    /// Natural language query.
    #[schemars(description = "Natural language query to search for")]
    pub query: String,

    /// `"memory"` or `"knowledge"`. Defaults to `"memory"`.
    #[schemars(
        description = "Which store to search: 'memory' (personal memories) or 'knowledge' (curated documents). Defaults to 'memory'."
    )]
    pub store: Option<String>,

    /// Maximum number of results. Defaults to the store's configured k.
    #[schemars(
        description = "Maximum number of results to return (1-20). Defaults to 5 for memory and 3 for knowledge."
    )]
    pub max_results: Option<usize>,
}
