//! Output layout of one repository
//!
//! ```text
//! {owner}_{repo}/
//!   all_workflow_runs/{run_id}_{name}/
//!   failure_workflow_runs/{run_id}_{name}/
//!   retry_workflow_runs/{run_id}_{name}/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harvest_core::domain::repo::RepoRef;

pub const ALL_RUNS_DIR: &str = "all_workflow_runs";
pub const FAILURE_RUNS_DIR: &str = "failure_workflow_runs";
pub const RETRY_RUNS_DIR: &str = "retry_workflow_runs";

pub const RUN_DETAIL_FILE: &str = "workflow_run.json";
pub const JOBS_FILE: &str = "jobs.json";
pub const LOGS_FILE: &str = "logs.zip";

/// The three view roots of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    pub root: PathBuf,
    pub all: PathBuf,
    pub failures: PathBuf,
    pub retries: PathBuf,
}

impl RepoLayout {
    pub fn new(output_dir: &Path, repo: &RepoRef) -> Self {
        let root = output_dir.join(format!("{}_{}", repo.owner, repo.name));
        Self {
            all: root.join(ALL_RUNS_DIR),
            failures: root.join(FAILURE_RUNS_DIR),
            retries: root.join(RETRY_RUNS_DIR),
            root,
        }
    }

    /// Creates all three view roots
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.all, &self.failures, &self.retries] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {:?}", dir))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_paths() {
        let layout = RepoLayout::new(Path::new("out"), &RepoRef::new("acme", "widget"));

        assert_eq!(layout.root, PathBuf::from("out/acme_widget"));
        assert_eq!(layout.all, PathBuf::from("out/acme_widget/all_workflow_runs"));
        assert_eq!(
            layout.failures,
            PathBuf::from("out/acme_widget/failure_workflow_runs")
        );
        assert_eq!(
            layout.retries,
            PathBuf::from("out/acme_widget/retry_workflow_runs")
        );
    }

    #[test]
    fn test_ensure_creates_views() {
        let dir = tempdir().unwrap();
        let layout = RepoLayout::new(dir.path(), &RepoRef::new("acme", "widget"));

        layout.ensure().unwrap();
        layout.ensure().unwrap();

        assert!(layout.all.is_dir());
        assert!(layout.failures.is_dir());
        assert!(layout.retries.is_dir());
    }
}
