//! Workflow run domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conclusion label the forge uses for failed runs
pub const FAILURE_CONCLUSION: &str = "failure";

/// A single workflow run as returned by the forge
///
/// Only the fields the exporter reads are typed. Everything else the forge
/// sends is kept in `extra` so the record round-trips to disk intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Attempt number, starting at 1
    #[serde(default)]
    pub run_attempt: Option<u32>,

    /// Terminal outcome; null while the run is still in progress
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Path of the workflow file inside the repository
    #[serde(default)]
    pub path: Option<String>,

    /// Commit the run executed against
    #[serde(default)]
    pub head_sha: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowRun {
    /// Run name, or an empty string when the forge omits it
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Attempt number, defaulting to 1 when absent
    pub fn attempt(&self) -> u32 {
        self.run_attempt.unwrap_or(1)
    }

    pub fn is_failure(&self) -> bool {
        self.conclusion.as_deref() == Some(FAILURE_CONCLUSION)
    }

    pub fn is_retry(&self) -> bool {
        self.attempt() > 1
    }

    /// Base filename of the workflow definition, if the run exposes a path
    pub fn workflow_file_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        std::path::Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
    }
}
