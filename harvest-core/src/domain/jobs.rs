//! Job list domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Jobs belonging to one workflow run
///
/// Job records are opaque to the exporter and are persisted as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsResult {
    #[serde(default)]
    pub total_count: Option<u64>,

    #[serde(default)]
    pub jobs: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
