//! MCP `add_knowledge` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `add_knowledge` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddKnowledgeParams {
    #[schemars(description = "Optional document title; indexed together with the content")]
    pub title: Option<String>,

    #[schemars(description = "The document text")]
    pub content: String,

    #[schemars(
        description = "Category: 'programming', 'ai', 'software', 'tech', or 'general'. Inferred from the text when omitted."
    )]
    pub category: Option<String>,

    #[schemars(description = "Optional free-form tags")]
    pub tags: Option<Vec<String>>,
}
