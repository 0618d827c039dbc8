//! Routing module
//!
//! Maps request paths onto configured vanity import paths:
//! - Route table built once at startup, sorted by path
//! - Exact and direct-child lookups by binary search
//! - Longest configured prefix as the fallback

mod resolver;
mod table;

pub use resolver::ResolvedMatch;
pub use table::{Route, RouteTable};
