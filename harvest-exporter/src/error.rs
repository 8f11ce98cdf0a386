//! Configuration-level errors
//!
//! These are the only failures that abort the whole batch. Everything that
//! goes wrong while exporting a single run is logged and skipped instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No bearer credential in the environment or `.env`
    #[error("GITHUB_TOKEN is not set; export it or add it to a .env file")]
    MissingCredential,

    /// The repository list could not be opened or its header read
    #[error("Cannot read repository list {}: {source}", .path.display())]
    RepoListUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
