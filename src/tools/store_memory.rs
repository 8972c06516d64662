use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreMemoryParams {
    #[schemars(description = "The natural language content of the memory")]
    pub content: String,

    #[schemars(
        description = "Where the memory came from, e.g. 'user_statement' or 'conversation'. Defaults to 'user_statement'."
    )]
    pub provenance: Option<String>,

    #[schemars(
        description = "Importance score 0.0-1.0. Computed from the content when omitted."
    )]
    pub importance: Option<f64>,

    #[schemars(
        description = "If true, only store the content when it contains a storage trigger phrase such as 'remember', 'my name', or 'i like'. Provenance and importance are ignored."
    )]
    pub only_if_triggered: Option<bool>,
}
