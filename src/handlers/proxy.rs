use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use log::{debug, error};
use thiserror::Error;

use crate::api::API_PREFIX;
use crate::state::AppState;

/// Upper bound for request bodies passed to the backend.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const REQUEST_HEADERS: [HeaderName; 4] = [
    header::COOKIE,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
    header::CONTENT_TYPE,
];

const RESPONSE_HEADERS: [HeaderName; 5] = [
    header::CONTENT_TYPE,
    header::CACHE_CONTROL,
    header::CONTENT_DISPOSITION,
    header::SET_COOKIE,
    header::LOCATION,
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("could not read request body: {0}")]
    Body(#[from] axum::Error),
    #[error("backend unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("could not build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!("Proxy error: {self}");
        let status = match self {
            ProxyError::Body(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn backend_url(base: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}{}/{}",
        base.trim_end_matches('/'),
        API_PREFIX,
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn copy_headers(from: &HeaderMap, names: &[HeaderName]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in names {
        for value in from.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Forwards `/api/v1/*` to the backend. The response body is streamed back
/// as it arrives so event streams pass through unbuffered; redirects are
/// handed to the browser rather than followed.
pub async fn proxy_api(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let url = backend_url(&state.settings.backend_url, &path, parts.uri.query());
    let body = to_bytes(body, MAX_BODY_BYTES).await?;
    debug!("Proxying {} {url}", parts.method);

    let mut upstream = state
        .http
        .request(parts.method, &url)
        .headers(copy_headers(&parts.headers, &REQUEST_HEADERS));
    if !body.is_empty() {
        upstream = upstream.body(body);
    }
    let response = upstream.send().await?;

    let mut builder = Response::builder().status(response.status());
    if let Some(headers) = builder.headers_mut() {
        headers.extend(copy_headers(response.headers(), &RESPONSE_HEADERS));
    }
    Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_backend_url() {
        assert_eq!(
            backend_url("http://backend:8000/", "docs/documents", Some("page=1")),
            "http://backend:8000/api/v1/docs/documents?page=1"
        );
        assert_eq!(
            backend_url("http://backend:8000", "/config", Some("")),
            "http://backend:8000/api/v1/config"
        );
    }

    #[test]
    fn test_copy_headers_keeps_only_listed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=abc"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("nl-NL"));

        let copied = copy_headers(&headers, &REQUEST_HEADERS);
        assert_eq!(copied.len(), 2);
        assert_eq!(copied[header::COOKIE], "session=abc");
        assert!(copied.get(header::HOST).is_none());
    }

    #[test]
    fn test_copy_headers_keeps_every_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let copied = copy_headers(&headers, &RESPONSE_HEADERS);
        assert_eq!(copied.get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
