//! Request handler module
//!
//! Responsible for method dispatch and static asset delivery.

pub mod asset;
pub mod dispatch;
pub mod router;

// Re-export main entry point
pub use asset::{AssetError, AssetStore};
pub use dispatch::{Dispatcher, MethodPolicy};
pub use router::handle_request;
