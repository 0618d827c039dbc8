//! HTTP protocol layer module
//!
//! Response builders and cache header rendering, decoupled from the vanity
//! page logic.

pub mod cache;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_html_response,
    build_options_response,
};
