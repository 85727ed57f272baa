//! Method dispatch module
//!
//! Maps each HTTP method to the policy that produces its response. Methods
//! are added by registering a policy, and unregistered methods get 501.

use crate::handler::asset::AssetStore;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::collections::HashMap;

/// Message the default POST policy wraps in HTML
pub const POST_MESSAGE: &str = "POST!";

/// Response-generation strategy registered for a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPolicy {
    /// 200 with the static asset as body, 500 if it cannot be read
    ServeAsset,
    /// 200 with the HTML headers and an empty body
    HeadersOnly,
    /// 200 with `message` wrapped in an HTML document
    Message(String),
}

#[derive(Debug)]
pub struct Dispatcher {
    policies: HashMap<Method, MethodPolicy>,
    assets: AssetStore,
}

impl Dispatcher {
    /// Dispatcher with no registered methods
    pub fn new(assets: AssetStore) -> Self {
        Self {
            policies: HashMap::new(),
            assets,
        }
    }

    /// GET serves the asset, HEAD sends headers only, POST answers "POST!"
    pub fn with_defaults(assets: AssetStore) -> Self {
        let mut dispatcher = Self::new(assets);
        dispatcher.register(Method::GET, MethodPolicy::ServeAsset);
        dispatcher.register(Method::HEAD, MethodPolicy::HeadersOnly);
        dispatcher.register(Method::POST, MethodPolicy::Message(POST_MESSAGE.to_string()));
        dispatcher
    }

    /// Register `policy` for `method`, returning the policy it replaces
    pub fn register(&mut self, method: Method, policy: MethodPolicy) -> Option<MethodPolicy> {
        self.policies.insert(method, policy)
    }

    pub fn policy(&self, method: &Method) -> Option<&MethodPolicy> {
        self.policies.get(method)
    }

    /// Registered methods as an `Allow` header value, e.g. "GET, HEAD, POST"
    pub fn allowed_methods(&self) -> String {
        let mut methods: Vec<&str> = self.policies.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        methods.join(", ")
    }

    /// Produce the response for a request with `method`
    pub async fn dispatch(&self, method: &Method) -> Response<Full<Bytes>> {
        match self.policies.get(method) {
            Some(MethodPolicy::ServeAsset) => self.serve_asset().await,
            Some(MethodPolicy::HeadersOnly) => http::build_headers_only_response(),
            Some(MethodPolicy::Message(message)) => {
                http::build_html_response(Bytes::from(http::html_message(message)))
            }
            None => {
                logger::log_warning(&format!("Unsupported method: {method}"));
                http::build_501_response(&self.allowed_methods())
            }
        }
    }

    async fn serve_asset(&self) -> Response<Full<Bytes>> {
        match self.assets.read().await {
            Ok(content) => http::build_html_response(content),
            Err(e) => {
                logger::log_error(&e.to_string());
                http::build_500_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;
    use std::path::Path;

    const POST_BODY: &str = "<html><body><h1>POST!</h1></body></html>";

    fn dispatcher_for(path: &Path) -> Dispatcher {
        Dispatcher::with_defaults(AssetStore::new(path, false))
    }

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_get_serves_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();

        let response = dispatcher_for(&path).dispatch(&Method::GET).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_of(response).await, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_get_without_asset_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");

        let response = dispatcher_for(&path).dispatch(&Method::GET).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_after_delete_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let dispatcher = dispatcher_for(&path);

        assert_eq!(dispatcher.dispatch(&Method::GET).await.status(), StatusCode::OK);
        std::fs::remove_file(&path).unwrap();
        assert_ne!(dispatcher.dispatch(&Method::GET).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_head_never_touches_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.html");

        let response = dispatcher_for(&path).dispatch(&Method::HEAD).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_post_answers_fixed_html() {
        let dir = tempfile::tempdir().unwrap();
        let response = dispatcher_for(dir.path()).dispatch(&Method::POST).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_of(response).await, POST_BODY);
    }

    #[tokio::test]
    async fn test_unregistered_method_is_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let response = dispatcher_for(dir.path()).dispatch(&Method::DELETE).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.headers()["allow"], "GET, HEAD, POST");
    }

    #[tokio::test]
    async fn test_register_new_verb() {
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(dir.path());
        let previous = dispatcher.register(Method::PUT, MethodPolicy::Message("PUT!".to_string()));
        assert_eq!(previous, None);
        assert_eq!(
            dispatcher.policy(&Method::PUT),
            Some(&MethodPolicy::Message("PUT!".to_string()))
        );

        let response = dispatcher.dispatch(&Method::PUT).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "<html><body><h1>PUT!</h1></body></html>");
        assert_eq!(dispatcher.allowed_methods(), "GET, HEAD, POST, PUT");
    }

    #[test]
    fn test_empty_dispatcher() {
        let dispatcher = Dispatcher::new(AssetStore::new("./index.html", false));
        assert_eq!(dispatcher.policy(&Method::GET), None);
        assert_eq!(dispatcher.allowed_methods(), "");
    }
}
