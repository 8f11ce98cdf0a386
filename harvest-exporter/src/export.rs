//! Export orchestrator
//!
//! Walks the repositories in order and, for each listed run, fetches its
//! metadata, workflow definition and logs, writes the bundle under the
//! all-runs view and copies it into the failure and retry views when the run
//! qualifies.
//!
//! A run that cannot be exported is logged and counted; it never stops the
//! batch.

use std::path::{Path, PathBuf};

use anyhow::Result;
use harvest_client::ForgeApi;
use harvest_core::domain::jobs::JobsResult;
use harvest_core::domain::repo::RepoRef;
use harvest_core::domain::run::WorkflowRun;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::layout::{JOBS_FILE, LOGS_FILE, RUN_DETAIL_FILE, RepoLayout};
use crate::sink;
use crate::summary::{ExportSummary, RepoReport, RunOutcome};

/// Workflow file as it existed at the run's head revision
#[derive(Debug, Clone)]
struct WorkflowDefinition {
    file_name: String,
    content: String,
}

/// Drives the export of a batch of repositories
pub struct Exporter<'a> {
    config: &'a Config,
    forge: &'a dyn ForgeApi,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a Config, forge: &'a dyn ForgeApi) -> Self {
        Self { config, forge }
    }

    /// Exports every repository, one at a time, in input order
    pub async fn export_all(&self, repos: &[RepoRef]) -> ExportSummary {
        let mut summary = ExportSummary::default();

        for repo in repos {
            let report = self.export_repository(repo).await;
            summary.repos.push(report);
        }

        info!("Extraction completed for all repositories");
        summary
    }

    /// Exports the runs of a single repository
    pub async fn export_repository(&self, repo: &RepoRef) -> RepoReport {
        info!("==> Processing repository {}", repo);

        let mut report = RepoReport::new(repo.clone());
        let layout = RepoLayout::new(&self.config.output_dir, repo);

        if let Err(e) = layout.ensure() {
            error!("Skipping repository {}: {:#}", repo, e);
            return report;
        }
        info!("Writing runs of {} to {}", repo, layout.root.display());

        let runs = self
            .forge
            .list_workflow_runs(repo, self.config.max_runs)
            .await;
        report.listed = runs.len();
        info!("{} workflow runs found for {}", runs.len(), repo);

        for (index, run) in runs.iter().enumerate() {
            if index > 0 && !self.config.run_delay.is_zero() {
                tokio::time::sleep(self.config.run_delay).await;
            }

            let outcome = self.export_run(repo, &layout, run).await;
            report.record(outcome);
        }

        report
    }

    /// Exports one run; classification uses the listing summary in `run`
    async fn export_run(
        &self,
        repo: &RepoRef,
        layout: &RepoLayout,
        run: &WorkflowRun,
    ) -> RunOutcome {
        info!(
            "Processing run {} - {} (attempt: {}, conclusion: {})",
            run.id,
            run.display_name(),
            run.attempt(),
            run.conclusion.as_deref().unwrap_or("none")
        );

        let detail = self.forge.get_run_detail(repo, run.id).await;
        let jobs = self.forge.get_jobs(repo, run.id).await;

        let (Ok(detail), Ok(jobs)) = (detail, jobs) else {
            warn!("Skipping run {}: run detail or jobs unavailable", run.id);
            return RunOutcome::SkippedMetadata;
        };

        let workflow = self.fetch_workflow_definition(repo, &detail).await;

        let run_dir = match write_metadata(&layout.all, run, &detail, &jobs, workflow.as_ref()) {
            Ok(dir) => dir,
            Err(e) => {
                error!("Failed to write run {}: {:#}", run.id, e);
                return RunOutcome::WriteFailed;
            }
        };

        let logs = match self.forge.download_log_archive(repo, run.id).await {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!(
                    "No {} for run {}; leaving it out of the failure and retry views",
                    LOGS_FILE, run.id
                );
                return RunOutcome::LogsMissing;
            }
        };

        if let Err(e) = sink::write_binary(&logs, &run_dir.join(LOGS_FILE)) {
            error!("Failed to write logs of run {}: {:#}", run.id, e);
            return RunOutcome::WriteFailed;
        }

        match classify(layout, run, &run_dir) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to copy run {} into its views: {:#}", run.id, e);
                RunOutcome::WriteFailed
            }
        }
    }

    /// Fetches the workflow file named by the run detail, if any
    async fn fetch_workflow_definition(
        &self,
        repo: &RepoRef,
        detail: &WorkflowRun,
    ) -> Option<WorkflowDefinition> {
        let path = detail.path.as_deref()?;
        let file_name = detail.workflow_file_name()?.to_string();

        let content = self
            .forge
            .get_file_content(repo, path, detail.head_sha.as_deref())
            .await
            .ok()?;

        Some(WorkflowDefinition { file_name, content })
    }
}

/// Writes run detail, jobs and the workflow file under the all-runs view
///
/// A log archive left in the run directory by an earlier export is removed,
/// so `logs.zip` is only present when this export downloaded it.
fn write_metadata(
    all_runs: &Path,
    run: &WorkflowRun,
    detail: &WorkflowRun,
    jobs: &JobsResult,
    workflow: Option<&WorkflowDefinition>,
) -> Result<PathBuf> {
    let run_dir = sink::create_run_directory(all_runs, run.id, run.display_name())?;
    sink::remove_file_if_exists(&run_dir.join(LOGS_FILE))?;

    sink::write_structured(detail, &run_dir.join(RUN_DETAIL_FILE))?;
    sink::write_structured(jobs, &run_dir.join(JOBS_FILE))?;

    if let Some(workflow) = workflow {
        sink::write_text(&workflow.content, &run_dir.join(&workflow.file_name))?;
    }

    Ok(run_dir)
}

/// Copies a complete bundle into the failure and retry views as applicable
fn classify(layout: &RepoLayout, run: &WorkflowRun, run_dir: &Path) -> Result<RunOutcome> {
    let failure_copy = run.is_failure();
    if failure_copy {
        let dir = sink::create_run_directory(&layout.failures, run.id, run.display_name())?;
        sink::copy_tree(run_dir, &dir)?;
    }

    let retry_copy = run.is_retry();
    if retry_copy {
        let dir = sink::create_run_directory(&layout.retries, run.id, run.display_name())?;
        sink::copy_tree(run_dir, &dir)?;
    }

    Ok(RunOutcome::Exported {
        failure_copy,
        retry_copy,
    })
}
