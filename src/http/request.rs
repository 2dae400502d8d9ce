//! Request inspection.
//!
//! # Responsibilities
//! - Resolve the correlation identifier (caller-supplied or UUID v4)
//! - Work out the best-effort client IP
//! - Extract the fields every request log entry carries
//! - Decode JSON bodies with rejections shaped like every other error
//!
//! # Design Decisions
//! - A caller's `X-Request-Id` is trusted verbatim; only empty or
//!   non-visible-ASCII values are replaced
//! - IP precedence: explicit [`ClientIp`] extension, first `X-Forwarded-For`
//!   hop, transport peer address

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequest},
    http::{header, HeaderMap, HeaderName, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::observability::RequestFields;

/// Correlation identifier header, read on requests and echoed on responses.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Client address established by an outer layer (e.g. a trusted proxy hop).
/// Takes precedence over headers and the socket peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// `Json<T>` whose rejections (bad syntax, wrong content type, missing
/// fields) become a 400 `{"error": ..}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Use the caller's `X-Request-Id` if non-empty, else mint a UUID v4.
pub fn resolve_correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Best-effort client IP.
pub fn client_ip<B>(request: &Request<B>) -> Option<String> {
    if let Some(ClientIp(ip)) = request.extensions().get::<ClientIp>() {
        return Some(ip.to_string());
    }

    let forwarded = request
        .headers()
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty());
    if let Some(hop) = forwarded {
        return Some(hop.to_string());
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// Path and query as the caller sent them.
pub fn request_url<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Collect the fixed log fields for `request`.
pub fn request_fields<B>(request: &Request<B>, correlation_id: String) -> RequestFields {
    RequestFields {
        correlation_id,
        method: request.method().to_string(),
        url: request_url(request),
        ip: client_ip(request),
        user_agent: request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_caller_id_used_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(resolve_correlation_id(&headers), "abc-123");
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let request = Request::builder()
            .header("X-Request-Id", "Mixed-Case")
            .body(Body::empty())
            .unwrap();
        assert_eq!(resolve_correlation_id(request.headers()), "Mixed-Case");
    }

    #[test]
    fn test_missing_or_empty_id_is_generated() {
        let generated = resolve_correlation_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static(""));
        let replaced = resolve_correlation_id(&headers);
        assert!(!replaced.is_empty());
        assert_ne!(replaced, generated);
    }

    #[test]
    fn test_opaque_bytes_are_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_bytes(b"caf\xe9").unwrap());
        assert!(Uuid::parse_str(&resolve_correlation_id(&headers)).is_ok());
    }

    #[test]
    fn test_ip_precedence() {
        let peer: SocketAddr = "192.168.1.9:51000".parse().unwrap();

        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.5, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_ip(&request).as_deref(), Some("203.0.113.5"));

        request.extensions_mut().insert(ClientIp("198.51.100.2".parse().unwrap()));
        assert_eq!(client_ip(&request).as_deref(), Some("198.51.100.2"));

        let mut bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&bare), None);
        bare.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_ip(&bare).as_deref(), Some("192.168.1.9"));
    }

    #[test]
    fn test_request_fields() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/users?dry_run=1")
            .header("user-agent", "curl/8.0")
            .body(Body::empty())
            .unwrap();

        let fields = request_fields(&request, "id-1".to_string());
        assert_eq!(fields.method, "POST");
        assert_eq!(fields.url, "/api/users?dry_run=1");
        assert_eq!(fields.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(fields.ip, None);
    }
}
