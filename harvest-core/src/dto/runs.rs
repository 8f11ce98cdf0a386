//! Workflow run list DTOs

use serde::{Deserialize, Serialize};

use crate::domain::run::WorkflowRun;

/// One page of the run listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunsPage {
    #[serde(default)]
    pub total_count: Option<u64>,

    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}
