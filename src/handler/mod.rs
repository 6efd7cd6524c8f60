//! Request handler module
//!
//! Resolves request paths under the document root and serves files,
//! index documents and directory listings.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{finalize_response, handle_request};
