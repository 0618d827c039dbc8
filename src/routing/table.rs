//! Route table construction
//!
//! Normalizes the configured path mapping into a sorted, immutable table and
//! precomputes everything a response needs from it.

use std::collections::BTreeMap;

use crate::config::PathConfig;
use crate::error::ConfigError;
use crate::http::cache::CachePolicy;

const DEFAULT_VCS: &str = "git";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_CACHE_MAX_AGE: u64 = 86_400;

/// One configured vanity path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Normalized path, no trailing slash
    pub path: String,
    pub repo: String,
    pub vcs: String,
    pub branch: String,
    /// `go-source` directory/file templates for this repository
    pub display: String,
}

impl Route {
    fn new(raw_path: &str, cfg: &PathConfig) -> Self {
        let path = raw_path.strip_suffix('/').unwrap_or(raw_path);
        let vcs = cfg.vcs.as_deref().filter(|v| !v.is_empty()).unwrap_or(DEFAULT_VCS);
        let branch = cfg
            .branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRANCH);
        let repo = &cfg.repo;

        Self {
            path: path.to_string(),
            repo: repo.clone(),
            vcs: vcs.to_string(),
            branch: branch.to_string(),
            display: format!(
                "{repo} {repo}/tree/{branch}{{/dir}} {repo}/blob/{branch}{{/dir}}/{{file}}#L{{line}}"
            ),
        }
    }
}

/// Routes sorted ascending by path
///
/// Never mutated after `build`; the ordering is what makes the lower-bound
/// search in `resolve` valid.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub(super) routes: Vec<Route>,
    cache_control: String,
}

impl RouteTable {
    /// Build the table from raw path keys and an optional cache max-age
    pub fn build(
        paths: &BTreeMap<String, PathConfig>,
        cache_max_age: Option<i64>,
    ) -> Result<Self, ConfigError> {
        let max_age = match cache_max_age {
            None => DEFAULT_CACHE_MAX_AGE,
            Some(age) => u64::try_from(age).map_err(|_| ConfigError::NegativeCacheAge(age))?,
        };

        let mut routes: Vec<Route> = paths
            .iter()
            .map(|(raw_path, cfg)| Route::new(raw_path, cfg))
            .collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(dup) = routes.windows(2).find(|w| w[0].path == w[1].path) {
            return Err(ConfigError::DuplicatePath(dup[0].path.clone()));
        }

        Ok(Self {
            routes,
            cache_control: CachePolicy::Public(max_age).to_header_value(),
        })
    }

    /// `Cache-Control` value for vanity responses
    pub fn cache_control(&self) -> &str {
        &self.cache_control
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
