//! Workflow run endpoints

use harvest_core::domain::jobs::JobsResult;
use harvest_core::domain::repo::RepoRef;
use harvest_core::domain::run::WorkflowRun;
use harvest_core::dto::runs::RunsPage;
use tracing::{debug, warn};

use crate::ForgeClient;
use crate::error::Result;

/// Page size requested from the run listing endpoint
pub const PAGE_SIZE: u32 = 100;

impl ForgeClient {
    // =============================================================================
    // Run Listing
    // =============================================================================

    /// List workflow runs of a repository
    ///
    /// Pages through the listing until a page comes back empty or `cap` runs
    /// have been collected. The result never holds more than `cap` runs.
    ///
    /// A failed page is logged and stops pagination; the runs accumulated so
    /// far are returned. This never fails.
    ///
    /// # Arguments
    /// * `repo` - The repository to list
    /// * `cap` - Maximum number of runs, or `None` for every page
    pub async fn list_workflow_runs(&self, repo: &RepoRef, cap: Option<usize>) -> Vec<WorkflowRun> {
        let mut runs = Vec::new();
        if cap == Some(0) {
            return runs;
        }

        let mut page = 1;
        loop {
            match self.fetch_runs_page(repo, page).await {
                Ok(batch) if batch.is_empty() => break,
                Ok(batch) => {
                    debug!("Fetched {} runs from page {} of {}", batch.len(), page, repo);
                    runs.extend(batch);
                    if cap.is_some_and(|cap| runs.len() >= cap) {
                        break;
                    }
                    page += 1;
                }
                Err(e) if e.is_rate_limited() => {
                    warn!("Rate limited on page {} of workflow runs for {}: {}", page, repo, e);
                    break;
                }
                Err(e) => {
                    warn!("Failed to fetch page {} of workflow runs for {}: {}", page, repo, e);
                    break;
                }
            }
        }

        if let Some(cap) = cap {
            runs.truncate(cap);
        }
        runs
    }

    async fn fetch_runs_page(&self, repo: &RepoRef, page: u32) -> Result<Vec<WorkflowRun>> {
        let url = self.repo_url(repo, "actions/runs");
        let response = self
            .get(&url)
            .query(&[("per_page", PAGE_SIZE), ("page", page)])
            .timeout(self.request_timeout)
            .send()
            .await?;

        let page: RunsPage = self.handle_response(response).await?;
        Ok(page.workflow_runs)
    }

    // =============================================================================
    // Run Metadata
    // =============================================================================

    /// Get the full record of a workflow run
    pub async fn get_run_detail(&self, repo: &RepoRef, run_id: u64) -> Result<WorkflowRun> {
        let url = self.repo_url(repo, &format!("actions/runs/{}", run_id));
        self.fetch_json(&url)
            .await
            .inspect_err(|e| warn!("Failed to fetch detail of run {}: {}", run_id, e))
    }

    /// Get the jobs of a workflow run
    pub async fn get_jobs(&self, repo: &RepoRef, run_id: u64) -> Result<JobsResult> {
        let url = self.repo_url(repo, &format!("actions/runs/{}/jobs", run_id));
        self.fetch_json(&url)
            .await
            .inspect_err(|e| warn!("Failed to fetch jobs of run {}: {}", run_id, e))
    }

    // =============================================================================
    // Run Logs
    // =============================================================================

    /// Download the log archive of a workflow run
    ///
    /// The forge answers with a redirect to blob storage, which is followed.
    /// The returned bytes are the zip archive, unmodified.
    pub async fn download_log_archive(&self, repo: &RepoRef, run_id: u64) -> Result<Vec<u8>> {
        let url = self.repo_url(repo, &format!("actions/runs/{}/logs", run_id));
        self.fetch_log_bytes(&url)
            .await
            .inspect_err(|e| warn!("Failed to download logs of run {}: {}", run_id, e))
    }

    async fn fetch_log_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).timeout(self.log_timeout).send().await?;
        self.handle_bytes_response(response).await
    }
}
