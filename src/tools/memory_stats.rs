//! MCP `memory_stats` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `memory_stats` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MemoryStatsParams {
    /// `"memory"` or `"knowledge"`. Defaults to `"memory"`.
    #[schemars(description = "Which store to report on: 'memory' or 'knowledge'. Defaults to 'memory'.")]
    pub store: Option<String>,
}
