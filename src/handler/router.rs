//! Request entry module
//!
//! Entry point for HTTP request processing: access logging around method dispatch.

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read. Only the method selects the response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let logging = &state.config.logging;
    let mut entry = logging
        .access_log
        .then(|| AccessLogEntry::from_request(peer_addr, &req));

    let response = state.dispatcher.dispatch(req.method()).await;

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(entry, &logging.access_log_format);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::{Method, StatusCode};

    fn state_for(asset: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::defaults().unwrap();
        config.asset.path = asset.to_string_lossy().into_owned();
        config.logging.access_log = false;
        Arc::new(AppState::new(&config))
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let state = state_for(&path);

        for target in ["/", "/index.html", "/some/deep/path?q=1"] {
            let response = handle_request(request(Method::GET, target, ""), Arc::clone(&state), None)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(body, "<p>hi</p>");
        }
    }

    #[tokio::test]
    async fn test_post_is_independent_of_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir.path().join("index.html"));

        let mut bodies = Vec::new();
        for payload in ["foo=bar", "", "\u{0}\u{1}not-a-form"] {
            let response = handle_request(request(Method::POST, "/", payload), Arc::clone(&state), None)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            bodies.push(response.into_body().collect().await.unwrap().to_bytes());
        }

        assert!(bodies
            .iter()
            .all(|b| b == "<html><body><h1>POST!</h1></body></html>"));
    }

    #[tokio::test]
    async fn test_access_logging_does_not_change_response() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::defaults().unwrap();
        config.asset.path = dir.path().join("absent.html").to_string_lossy().into_owned();
        config.logging.access_log_file = None;
        let state = Arc::new(AppState::new(&config));
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        let response = handle_request(request(Method::GET, "/", ""), state, Some(peer))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
