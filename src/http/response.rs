//! HTTP response building module
//!
//! Builders for every response this server emits, decoupled from dispatch.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};

/// Content type of every successful response
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Build 200 OK with an HTML body
pub fn build_html_response(body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 OK carrying the HTML headers and no body
pub fn build_headers_only_response() -> Response<Full<Bytes>> {
    build_html_response(Bytes::new())
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
    )
}

/// Build 501 Not Implemented response listing the supported methods
pub fn build_501_response(allow: &str) -> Response<Full<Bytes>> {
    let mut response = build_plain_response(StatusCode::NOT_IMPLEMENTED, "501 Not Implemented");
    if let Ok(value) = allow.parse() {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

fn build_plain_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
            *fallback.status_mut() = status;
            fallback
        })
}

/// Wrap `message` in a minimal HTML document
pub fn html_message(message: &str) -> String {
    format!("<html><body><h1>{message}</h1></body></html>")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
