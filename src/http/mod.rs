//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handlers: header profiles,
//! MIME detection, validators and response builders.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use headers::{CustomHeader, HeaderProfile, HeaderSet};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_options_response, build_redirect_response, Validators,
};
