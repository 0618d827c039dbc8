//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution against the route table, and page selection.

use crate::config::AppState;
use crate::handler::pages;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HOST;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method();
    let path = req.uri().path();
    let request_host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(hyper::http::uri::Authority::as_str))
        .unwrap_or_default();

    let response = match check_http_method(method) {
        Some(resp) => resp,
        None => match urlencoding::decode(path) {
            Ok(decoded) => dispatch(&decoded, request_host, *method == Method::HEAD, &state),
            Err(e) => {
                // No configured path can match bytes that are not UTF-8
                logger::log_debug(&format!("Undecodable request path {path}: {e}"));
                http::build_404_response()
            }
        },
    };

    if state.logging.access_log {
        let mut entry =
            AccessLogEntry::new(remote_addr.to_string(), method.to_string(), path.to_string());
        entry.host = request_host.to_string();
        entry.http_version = format!("{:?}", req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return an early response for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Pick and render the page for a percent-decoded request path
///
/// - Matched route: vanity page with the table's `Cache-Control`
/// - No match at "/": index of all routes
/// - Otherwise: 404
pub fn dispatch(
    path: &str,
    request_host: &str,
    is_head: bool,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let host = state.import_host(request_host);

    let rendered = match state.routes.resolve(path) {
        Some(m) => {
            logger::log_debug(&format!(
                "{path} -> {} (subpath {:?})",
                m.route.path, m.subpath
            ));
            http::build_html_response(
                pages::render_vanity_page(host, &state.docs_base, &m),
                Some(state.routes.cache_control()),
                is_head,
            )
        }
        None if path == "/" => http::build_html_response(
            pages::render_index_page(host, &state.docs_base, &state.routes),
            None,
            is_head,
        ),
        None => return http::build_404_response(),
    };

    rendered.unwrap_or_else(|e| {
        logger::log_error(&format!("Cannot render page for {path}: {e}"));
        http::build_500_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::header::{CACHE_CONTROL, CONTENT_LENGTH};
    use hyper::StatusCode;

    fn state(yaml: &str) -> Arc<AppState> {
        let mut cfg = Config::from_yaml_str(yaml).unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg).unwrap())
    }

    fn remote() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        path: &str,
        host: &str,
    ) -> (StatusCode, hyper::HeaderMap, String) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(HOST, host)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(state), remote()).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Extract the content attribute of a named meta tag
    fn find_meta<'a>(html: &'a str, name: &str) -> Option<&'a str> {
        let needle = format!("<meta name=\"{name}\" content=\"");
        let start = html.find(&needle)? + needle.len();
        let end = html[start..].find('"')?;
        Some(&html[start..start + end])
    }

    const PKG_CONFIG: &str = r"
host: go.example.com
paths:
  /pkg:
    repo: https://example.com/pkg
";

    #[tokio::test]
    async fn test_vanity_page_default_display() {
        let state = state(PKG_CONFIG);
        let (status, headers, body) = send(&state, Method::GET, "/pkg", "localhost").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=86400");
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("go.example.com/pkg git https://example.com/pkg")
        );
        assert_eq!(
            find_meta(&body, "go-source"),
            Some(
                "go.example.com/pkg https://example.com/pkg \
                 https://example.com/pkg/tree/master{/dir} \
                 https://example.com/pkg/blob/master{/dir}/{file}#L{line}"
            )
        );
    }

    #[tokio::test]
    async fn test_vanity_page_alt_branch_and_vcs() {
        let state = state(
            r"
host: go.example.com
cache_max_age: 0
paths:
  /package:
    repo: https://bitbucket.org/example/package
    vcs: hg
    branch: main
",
        );
        let (status, headers, body) =
            send(&state, Method::GET, "/package/sub/dir", "localhost").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=0");
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("go.example.com/package hg https://bitbucket.org/example/package")
        );
        assert!(find_meta(&body, "go-source")
            .unwrap()
            .contains("https://bitbucket.org/example/package/tree/main{/dir}"));
        assert!(body.contains("url=https://pkg.go.dev/go.example.com/package/sub/dir\""));
    }

    #[tokio::test]
    async fn test_host_taken_from_request_when_unset() {
        let state = state("paths:\n  /pkg:\n    repo: https://example.com/pkg\n");
        let (_, _, body) = send(&state, Method::GET, "/pkg", "vanity.test:8080").await;
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("vanity.test:8080/pkg git https://example.com/pkg")
        );
    }

    #[tokio::test]
    async fn test_index_page_at_root() {
        let state = state(PKG_CONFIG);
        let (status, headers, body) = send(&state, Method::GET, "/", "localhost").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(CACHE_CONTROL).is_none());
        assert_eq!(body.matches("<li>").count(), 1);
        assert!(body.contains(">go.example.com/pkg</a></li>"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = state(PKG_CONFIG);
        let (status, _, _) = send(&state, Method::GET, "/unknown", "localhost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_has_headers_without_body() {
        let state = state(PKG_CONFIG);
        let (status, headers, body) = send(&state, Method::HEAD, "/pkg", "localhost").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=86400");
        assert_ne!(headers[CONTENT_LENGTH], "0");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_method_checks() {
        let state = state(PKG_CONFIG);
        let (status, _, _) = send(&state, Method::POST, "/pkg", "localhost").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _, _) = send(&state, Method::OPTIONS, "/pkg", "localhost").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_mixed_case_path_served_as_configured() {
        let state = state(
            r"
host: go.example.com
paths:
  /MyOrg/Tool:
    repo: https://github.com/MyOrg/Tool
",
        );
        let (status, _, body) = send(&state, Method::GET, "/MyOrg/Tool/cmd", "localhost").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("go.example.com/MyOrg/Tool git https://github.com/MyOrg/Tool")
        );

        // Matching is case-sensitive
        let (status, _, _) = send(&state, Method::GET, "/myorg/tool", "localhost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_percent_encoded_request_path() {
        let state = state(
            r"
host: go.example.com
paths:
  /my pkg:
    repo: https://example.com/my-pkg
  /пакет:
    repo: https://example.com/paket
",
        );
        let (status, _, body) = send(&state, Method::GET, "/my%20pkg/sub", "localhost").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("go.example.com/my pkg git https://example.com/my-pkg")
        );

        let (status, _, body) = send(
            &state,
            Method::GET,
            "/%D0%BF%D0%B0%D0%BA%D0%B5%D1%82",
            "localhost",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            find_meta(&body, "go-import"),
            Some("go.example.com/пакет git https://example.com/paket")
        );
    }

    #[tokio::test]
    async fn test_undecodable_path_is_404() {
        let state = state(PKG_CONFIG);
        let (status, _, _) = send(&state, Method::GET, "/pkg%FF", "localhost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cache_age_beyond_u32() {
        let state = state(
            "cache_max_age: 5000000000\npaths:\n  /pkg:\n    repo: https://example.com/pkg\n",
        );
        let (status, headers, _) = send(&state, Method::GET, "/pkg", "localhost").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=5000000000");
    }

    #[test]
    fn test_root_route_takes_precedence_over_index() {
        let state = state("paths:\n  /:\n    repo: https://example.com/root\n");
        let resp = dispatch("/", "go.example.com", false, &state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(CACHE_CONTROL).is_some());
    }
}
