//! Vanity and index page rendering

use maud::{html, DOCTYPE};

use crate::routing::{ResolvedMatch, RouteTable};

/// Render the page Go tooling reads `go-import`/`go-source` from
///
/// Browsers are sent on to `{docs_base}/{import}/{subpath}`.
pub fn render_vanity_page(import_host: &str, docs_base: &str, m: &ResolvedMatch<'_>) -> String {
    let route = m.route;
    let import = format!("{import_host}{}", route.path);
    let docs_url = format!("{docs_base}/{import}/{}", m.subpath);

    html! {
        (DOCTYPE)
        html {
            head {
                meta http-equiv="Content-Type" content="text/html; charset=utf-8";
                meta name="go-import" content=(format!("{import} {} {}", route.vcs, route.repo));
                meta name="go-source" content=(format!("{import} {}", route.display));
                meta http-equiv="refresh" content=(format!("0; url={docs_url}"));
            }
            body {
                "Nothing to see here; "
                a href=(docs_url) { "see the package on " (site_name(docs_base)) }
                "."
            }
        }
    }
    .into_string()
}

/// Render the listing served at "/" when no route claims it
pub fn render_index_page(import_host: &str, docs_base: &str, table: &RouteTable) -> String {
    html! {
        (DOCTYPE)
        html {
            body {
                h1 { (import_host) }
                ul {
                    @for route in table.routes() {
                        @let name = format!("{import_host}{}", route.path);
                        li { a href=(format!("{docs_base}/{name}")) { (name) } }
                    }
                }
            }
        }
    }
    .into_string()
}

/// "https://pkg.go.dev/x" -> "pkg.go.dev"
fn site_name(docs_base: &str) -> &str {
    let rest = docs_base.split_once("://").map_or(docs_base, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathConfig;
    use std::collections::BTreeMap;

    fn table(entries: &[(&str, &str)]) -> RouteTable {
        let paths: BTreeMap<String, PathConfig> = entries
            .iter()
            .map(|(path, repo)| {
                (
                    (*path).to_string(),
                    PathConfig {
                        repo: (*repo).to_string(),
                        vcs: None,
                        branch: None,
                    },
                )
            })
            .collect();
        RouteTable::build(&paths, None).unwrap()
    }

    #[test]
    fn test_site_name() {
        assert_eq!(site_name("https://pkg.go.dev"), "pkg.go.dev");
        assert_eq!(site_name("https://docs.example.com/go"), "docs.example.com");
        assert_eq!(site_name("docs.example.com"), "docs.example.com");
    }

    #[test]
    fn test_vanity_page_meta_tags() {
        let table = table(&[("/pkg", "https://example.com/pkg")]);
        let m = table.resolve("/pkg/sub").unwrap();
        let html = render_vanity_page("go.example.com", "https://pkg.go.dev", &m);

        assert!(html.contains(
            r#"<meta name="go-import" content="go.example.com/pkg git https://example.com/pkg">"#
        ));
        assert!(html.contains(
            "<meta name=\"go-source\" content=\"go.example.com/pkg https://example.com/pkg \
             https://example.com/pkg/tree/master{/dir} \
             https://example.com/pkg/blob/master{/dir}/{file}#L{line}\">"
        ));
        assert!(html.contains("url=https://pkg.go.dev/go.example.com/pkg/sub\""));
        assert!(html.contains(">see the package on pkg.go.dev</a>"));
    }

    #[test]
    fn test_vanity_page_escapes_request_host() {
        let table = table(&[("/pkg", "https://example.com/pkg")]);
        let m = table.resolve("/pkg").unwrap();
        let html = render_vanity_page("evil\"><script>", "https://pkg.go.dev", &m);
        assert!(!html.contains("<script>"));
        assert!(html.contains("evil&quot;&gt;&lt;script&gt;/pkg git"));
    }

    #[test]
    fn test_index_page_lists_routes() {
        let table = table(&[("/b", "https://example.com/b"), ("/a", "https://example.com/a")]);
        let html = render_index_page("go.example.com", "https://pkg.go.dev", &table);

        assert!(html.contains("<h1>go.example.com</h1>"));
        let a = html
            .find(r#"<li><a href="https://pkg.go.dev/go.example.com/a">go.example.com/a</a></li>"#)
            .unwrap();
        let b = html
            .find(r#"<li><a href="https://pkg.go.dev/go.example.com/b">go.example.com/b</a></li>"#)
            .unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_index_page_escapes_paths() {
        let table = table(&[("/a&b", "https://example.com/ab")]);
        let html = render_index_page("go.example.com", "https://pkg.go.dev", &table);
        assert!(html.contains(">go.example.com/a&amp;b</a>"));
        assert!(!html.contains("a&b"));
    }
}
