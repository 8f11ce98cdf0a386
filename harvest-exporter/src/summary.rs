//! Batch summary
//!
//! Per-repository counters collected while exporting, and the report printed
//! once the batch is over.

use colored::*;
use harvest_core::domain::repo::RepoRef;

/// What happened to a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Bundle written under all runs, plus any classification copies
    Exported { failure_copy: bool, retry_copy: bool },
    /// Run detail or jobs were unavailable; nothing was written
    SkippedMetadata,
    /// Metadata written, log archive unavailable; no classification copies
    LogsMissing,
    /// A filesystem error interrupted the run
    WriteFailed,
}

/// Counters for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub repo: RepoRef,
    pub listed: usize,
    pub exported: usize,
    pub skipped_metadata: usize,
    pub logs_missing: usize,
    pub write_failures: usize,
    pub failure_copies: usize,
    pub retry_copies: usize,
}

impl RepoReport {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            listed: 0,
            exported: 0,
            skipped_metadata: 0,
            logs_missing: 0,
            write_failures: 0,
            failure_copies: 0,
            retry_copies: 0,
        }
    }

    pub fn record(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Exported {
                failure_copy,
                retry_copy,
            } => {
                self.exported += 1;
                self.failure_copies += usize::from(failure_copy);
                self.retry_copies += usize::from(retry_copy);
            }
            RunOutcome::SkippedMetadata => self.skipped_metadata += 1,
            RunOutcome::LogsMissing => self.logs_missing += 1,
            RunOutcome::WriteFailed => self.write_failures += 1,
        }
    }

    /// Runs that did not make it into the classification views
    pub fn incomplete(&self) -> usize {
        self.skipped_metadata + self.logs_missing + self.write_failures
    }
}

/// Counters for the whole batch, in repository order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub repos: Vec<RepoReport>,
}

impl ExportSummary {
    pub fn total_exported(&self) -> usize {
        self.repos.iter().map(|r| r.exported).sum()
    }

    pub fn total_incomplete(&self) -> usize {
        self.repos.iter().map(RepoReport::incomplete).sum()
    }

    /// Prints the per-repository report to stdout
    pub fn print(&self) {
        println!();
        println!("{}", "Export Summary:".bold());

        if self.repos.is_empty() {
            println!("  {}", "No repositories processed.".yellow());
            return;
        }

        for report in &self.repos {
            println!("  {}", report.repo.to_string().cyan());
            println!("    Listed:        {}", report.listed);
            println!("    Exported:      {}", report.exported.to_string().green());
            println!("    Failure views: {}", report.failure_copies);
            println!("    Retry views:   {}", report.retry_copies);

            if report.incomplete() > 0 {
                println!(
                    "    Incomplete:    {} (metadata {}, logs {}, write {})",
                    report.incomplete().to_string().red(),
                    report.skipped_metadata,
                    report.logs_missing,
                    report.write_failures
                );
            }
        }

        println!();
        println!(
            "  {} {} run(s) exported, {} incomplete",
            "Total:".bold(),
            self.total_exported(),
            self.total_incomplete()
        );
    }
}
