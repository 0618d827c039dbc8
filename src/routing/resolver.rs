//! Path resolution
//!
//! Finds the configured route for a request path and the subpath left over.

use super::table::{Route, RouteTable};

/// A matched route and the remainder of the request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMatch<'a> {
    pub route: &'a Route,
    pub subpath: &'a str,
}

impl RouteTable {
    /// Resolve a request path to its best configured route
    ///
    /// Matching order:
    /// 1. Exact path ("/abc" matches route "/abc", empty subpath)
    /// 2. Child of the lower-bound predecessor ("/abc/x" matches "/abc", subpath "x")
    /// 3. Longest literal prefix among routes sorting before the path
    ///    ("/abcdef" matches "/abc", subpath "def")
    ///
    /// Returns None if nothing matches.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<ResolvedMatch<'a>> {
        let routes = &self.routes;
        let i = routes.partition_point(|r| r.path.as_str() < path);

        if let Some(route) = routes.get(i).filter(|r| r.path == path) {
            return Some(ResolvedMatch { route, subpath: "" });
        }

        if let Some(route) = i.checked_sub(1).map(|prev| &routes[prev]) {
            if let Some(subpath) = strip_child(path, &route.path) {
                return Some(ResolvedMatch { route, subpath });
            }
        }

        // Nothing at or after i can be a prefix of path.
        longest_prefix(&routes[..i], path)
    }
}

/// "/abc/x" under "/abc" -> "x"
fn strip_child<'a>(path: &'a str, parent: &str) -> Option<&'a str> {
    path.strip_prefix(parent)?.strip_prefix('/')
}

/// Scan candidates for the one leaving the shortest remainder; the first
/// (lowest path) wins ties.
fn longest_prefix<'a>(candidates: &'a [Route], path: &'a str) -> Option<ResolvedMatch<'a>> {
    let mut best: Option<ResolvedMatch<'a>> = None;
    let mut shortest = path.len();

    for route in candidates {
        if route.path.len() >= path.len() {
            continue;
        }
        let Some(subpath) = path.strip_prefix(route.path.as_str()) else {
            continue;
        };
        if subpath.len() < shortest {
            shortest = subpath.len();
            best = Some(ResolvedMatch { route, subpath });
        }
    }

    best
}
