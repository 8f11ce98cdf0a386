//! In-process stub of the forge API for client tests

use axum::Router;

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Serves `router` on an ephemeral local port and returns its base URL
pub(crate) async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Whether the request carried the test bearer credential
pub(crate) fn is_authorized(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TEST_TOKEN))
}

/// Whether the request carried the media type, API version and user agent
/// the forge expects
pub(crate) fn has_api_headers(headers: &axum::http::HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("accept") == Some("application/vnd.github+json")
        && header("x-github-api-version") == Some("2022-11-28")
        && header("user-agent").is_some_and(|ua| ua.starts_with("harvest/"))
}
