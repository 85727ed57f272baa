//! Minimal HTTP server: GET serves a static HTML file, HEAD answers with
//! headers only, POST answers with a fixed HTML snippet.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
