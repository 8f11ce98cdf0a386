//! Repository contents endpoint

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use harvest_core::domain::repo::RepoRef;
use harvest_core::dto::content::ContentEntry;
use serde_json::Value;
use tracing::warn;

use crate::ForgeClient;
use crate::error::{ClientError, Result};

impl ForgeClient {
    /// Get the text of a repository file at a revision
    ///
    /// Only regular files carry a base64 payload. Directories, symlinks,
    /// submodules and files too large for inline content come back as
    /// [`ClientError::UnsupportedContent`]. Invalid UTF-8 is replaced rather
    /// than rejected.
    ///
    /// # Arguments
    /// * `repo` - The repository holding the file
    /// * `path` - Path of the file inside the repository
    /// * `revision` - Commit, branch or tag; the default branch when `None`
    pub async fn get_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        revision: Option<&str>,
    ) -> Result<String> {
        self.fetch_file_content(repo, path, revision)
            .await
            .inspect_err(|e| {
                warn!(
                    "Failed to fetch {} at {}: {}",
                    path,
                    revision.unwrap_or("default branch"),
                    e
                )
            })
    }

    async fn fetch_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
        revision: Option<&str>,
    ) -> Result<String> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(ClientError::InvalidRequest("empty content path".to_string()));
        }

        let url = self.repo_url(repo, &format!("contents/{}", path));
        let mut request = self.get(&url).timeout(self.request_timeout);
        if let Some(revision) = revision {
            request = request.query(&[("ref", revision)]);
        }

        let response = request.send().await?;
        let body: Value = self.handle_response(response).await?;

        if body.is_array() {
            return Err(ClientError::UnsupportedContent(format!(
                "{} is a directory",
                path
            )));
        }

        let entry: ContentEntry = serde_json::from_value(body)
            .map_err(|e| ClientError::ParseError(format!("Invalid content entry: {}", e)))?;

        let payload = entry.base64_payload().ok_or_else(|| {
            ClientError::UnsupportedContent(format!(
                "{} has no base64 payload (type {})",
                path,
                entry.kind.as_deref().unwrap_or("unknown")
            ))
        })?;

        decode_text(payload)
    }
}

/// Decodes a base64 payload into text
///
/// The forge wraps payloads at 60 columns, so whitespace is dropped first.
pub(crate) fn decode_text(payload: &str) -> Result<String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ClientError::ParseError(format!("Invalid base64 content: {}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;

    use super::*;
    use crate::test_support::{TEST_TOKEN, spawn_stub};

    const WORKFLOW: &str = "name: CI\non: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n";

    /// Splits an encoded payload into lines the way the forge does
    fn wrapped(text: &[u8]) -> String {
        let encoded = STANDARD.encode(text);
        encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn contents(
        Path((_owner, _repo, path)): Path<(String, String, String)>,
        Query(params): Query<HashMap<String, String>>,
    ) -> std::result::Result<Json<Value>, StatusCode> {
        let revision = params.get("ref").map(String::as_str);

        match (path.as_str(), revision) {
            (".github/workflows/ci.yml", Some("abc123")) => Ok(Json(json!({
                "type": "file",
                "path": ".github/workflows/ci.yml",
                "encoding": "base64",
                "content": wrapped(WORKFLOW.as_bytes())
            }))),
            (".github/workflows/binary.yml", _) => Ok(Json(json!({
                "type": "file",
                "encoding": "base64",
                "content": wrapped(b"name: \xff\xfe broken\n")
            }))),
            (".github/workflows", _) => Ok(Json(json!([
                { "type": "file", "path": ".github/workflows/ci.yml" }
            ]))),
            (".github/workflows/link.yml", _) => Ok(Json(json!({
                "type": "symlink",
                "target": "ci.yml"
            }))),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn client() -> ForgeClient {
        let router = Router::new().route("/repos/{owner}/{repo}/contents/{*path}", get(contents));
        let base_url = spawn_stub(router).await;
        ForgeClient::new(base_url, TEST_TOKEN).unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef::new("acme", "widget")
    }

    #[test]
    fn test_decode_text_ignores_line_breaks() {
        let text = decode_text(&wrapped(WORKFLOW.as_bytes())).unwrap();
        assert_eq!(text, WORKFLOW);
    }

    #[test]
    fn test_decode_text_rejects_garbage() {
        assert!(matches!(
            decode_text("not base64!"),
            Err(ClientError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_get_file_content_at_revision() {
        let client = client().await;

        let text = client
            .get_file_content(&repo(), ".github/workflows/ci.yml", Some("abc123"))
            .await
            .unwrap();

        assert_eq!(text, WORKFLOW);
    }

    #[tokio::test]
    async fn test_get_file_content_unknown_revision() {
        let client = client().await;

        let err = client
            .get_file_content(&repo(), ".github/workflows/ci.yml", Some("pruned"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_file_content_replaces_invalid_utf8() {
        let client = client().await;

        let text = client
            .get_file_content(&repo(), ".github/workflows/binary.yml", None)
            .await
            .unwrap();

        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with("broken\n"));
    }

    #[tokio::test]
    async fn test_get_file_content_directory_and_symlink_are_unsupported() {
        let client = client().await;

        let dir = client
            .get_file_content(&repo(), ".github/workflows", None)
            .await
            .unwrap_err();
        assert!(matches!(dir, ClientError::UnsupportedContent(_)));

        let link = client
            .get_file_content(&repo(), ".github/workflows/link.yml", None)
            .await
            .unwrap_err();
        assert!(matches!(link, ClientError::UnsupportedContent(_)));
    }

    #[tokio::test]
    async fn test_get_file_content_empty_path() {
        let client = client().await;

        let err = client.get_file_content(&repo(), "/", None).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
