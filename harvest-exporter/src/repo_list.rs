//! Repository list loader
//!
//! Reads the CSV file naming the repositories to export. The header row must
//! name `owner` and `repo` columns; any other columns are ignored.

use std::path::Path;

use harvest_core::domain::repo::RepoRef;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct RepoRow {
    owner: Option<String>,
    repo: Option<String>,
}

/// Loads repositories in file order
///
/// Rows where `owner` or `repo` is missing or blank are skipped. Only a file
/// that cannot be opened (or whose header cannot be read) is an error.
pub fn load_repositories(path: &Path) -> Result<Vec<RepoRef>, ConfigError> {
    let unreadable = |source| ConfigError::RepoListUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(unreadable)?;

    let headers = reader.headers().map_err(unreadable)?;
    if !headers.iter().any(|h| h == "owner") || !headers.iter().any(|h| h == "repo") {
        warn!(
            "{} has no owner/repo header; no repositories loaded",
            path.display()
        );
    }

    let mut repos = Vec::new();
    for (index, row) in reader.deserialize::<RepoRow>().enumerate() {
        // Header is line 1
        let line = index + 2;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping line {} of {}: {}", line, path.display(), e);
                continue;
            }
        };

        match (non_blank(row.owner), non_blank(row.repo)) {
            (Some(owner), Some(name)) => repos.push(RepoRef::new(owner, name)),
            _ => debug!("Skipping line {}: owner or repo missing", line),
        }
    }

    Ok(repos)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
