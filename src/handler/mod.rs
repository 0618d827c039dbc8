//! Request handler module
//!
//! Dispatches requests to the vanity page, the index page or a 404, and
//! renders the HTML for each.

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
