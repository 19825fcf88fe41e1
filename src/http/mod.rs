//! HTTP protocol layer module
//!
//! MIME detection and response building, decoupled from the resolver logic.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_405_response, build_options_response, ResponseBody,
};
