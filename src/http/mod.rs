//! HTTP protocol layer module
//!
//! Response builders shared by the method handlers.

pub mod response;

// Re-export commonly used items
pub use response::{
    build_500_response, build_501_response, build_headers_only_response, build_html_response,
    html_message, HTML_CONTENT_TYPE,
};
