//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract routing-relevant information (host, scheme, path)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The Host header wins over the URI authority

use axum::http::{header, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header carrying the scheme the client used in front of a TLS terminator.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Generates a UUID v4 request ID when the client sent none.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// What forward matching needs from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Host header value, possibly with port.
    pub host: String,
    pub scheme: String,
    pub path: String,
}

impl RequestTarget {
    /// `None` if the request names no host.
    pub fn from_request<B>(request: &Request<B>) -> Option<Self> {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| request.uri().authority().map(|a| a.to_string()))?;

        let scheme = request
            .headers()
            .get(X_FORWARDED_PROTO)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_lowercase())
            .or_else(|| request.uri().scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        Some(Self {
            host,
            scheme,
            path: request.uri().path().to_string(),
        })
    }

    /// The path below `context_path`, or `None` if the path lies outside it.
    pub fn path_below<'a>(&'a self, context_path: &str) -> Option<&'a str> {
        let context = context_path.trim_end_matches('/');
        let rest = self.path.strip_prefix(context)?;
        if rest.is_empty() {
            Some("/")
        } else {
            rest.starts_with('/').then_some(rest)
        }
    }
}

pub fn request_id<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_target_from_headers() {
        let req = Request::builder()
            .uri("/preview/news?link=/content")
            .header("Host", "www.example.com:8080")
            .header(X_FORWARDED_PROTO, "HTTPS")
            .body(Body::empty())
            .unwrap();

        let target = RequestTarget::from_request(&req).unwrap();
        assert_eq!(target.host, "www.example.com:8080");
        assert_eq!(target.scheme, "https");
        assert_eq!(target.path, "/preview/news");
    }

    #[test]
    fn test_target_from_absolute_uri() {
        let req = Request::builder()
            .uri("http://localhost:9000/a")
            .body(Body::empty())
            .unwrap();
        let target = RequestTarget::from_request(&req).unwrap();
        assert_eq!(target.host, "localhost:9000");
        assert_eq!(target.scheme, "http");

        let req = Request::builder().uri("/a").body(Body::empty()).unwrap();
        assert!(RequestTarget::from_request(&req).is_none());
    }

    #[test]
    fn test_path_below_context() {
        let target = RequestTarget {
            host: "localhost".into(),
            scheme: "http".into(),
            path: "/site/news".into(),
        };
        assert_eq!(target.path_below("/site"), Some("/news"));
        assert_eq!(target.path_below(""), Some("/site/news"));
        assert_eq!(target.path_below("/"), Some("/site/news"));
        assert_eq!(target.path_below("/si"), None);
        assert_eq!(target.path_below("/cms"), None);
    }

    #[test]
    fn test_uuid_request_id() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
