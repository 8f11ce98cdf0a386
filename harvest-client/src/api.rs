//! Forge API seam
//!
//! The exporter depends on this trait rather than on [`ForgeClient`] so the
//! export flow can be driven by an in-memory forge in tests.

use async_trait::async_trait;
use harvest_core::domain::jobs::JobsResult;
use harvest_core::domain::repo::RepoRef;
use harvest_core::domain::run::WorkflowRun;

use crate::ForgeClient;
use crate::error::Result;

/// Read-only operations the exporter needs from the forge
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Lists workflow runs, newest first, up to `cap` items
    ///
    /// A failed page ends pagination; whatever was accumulated is returned.
    async fn list_workflow_runs(&self, repo: &RepoRef, cap: Option<usize>) -> Vec<WorkflowRun>;

    /// Fetches the full record of one run
    async fn get_run_detail(&self, repo: &RepoRef, run_id: u64) -> Result<WorkflowRun>;

    /// Fetches the jobs of one run
    async fn get_jobs(&self, repo: &RepoRef, run_id: u64) -> Result<JobsResult>;

    /// Fetches a file's text at a revision (default branch when `None`)
    async fn get_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        revision: Option<&str>,
    ) -> Result<String>;

    /// Downloads the compressed log archive of one run
    async fn download_log_archive(&self, repo: &RepoRef, run_id: u64) -> Result<Vec<u8>>;
}

#[async_trait]
impl ForgeApi for ForgeClient {
    async fn list_workflow_runs(&self, repo: &RepoRef, cap: Option<usize>) -> Vec<WorkflowRun> {
        ForgeClient::list_workflow_runs(self, repo, cap).await
    }

    async fn get_run_detail(&self, repo: &RepoRef, run_id: u64) -> Result<WorkflowRun> {
        ForgeClient::get_run_detail(self, repo, run_id).await
    }

    async fn get_jobs(&self, repo: &RepoRef, run_id: u64) -> Result<JobsResult> {
        ForgeClient::get_jobs(self, repo, run_id).await
    }

    async fn get_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        revision: Option<&str>,
    ) -> Result<String> {
        ForgeClient::get_file_content(self, repo, path, revision).await
    }

    async fn download_log_archive(&self, repo: &RepoRef, run_id: u64) -> Result<Vec<u8>> {
        ForgeClient::download_log_archive(self, repo, run_id).await
    }
}
