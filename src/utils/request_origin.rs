//! Request origin extraction from HTTP request parts.

use crate::AppError;
use crate::domain::verification::RequestOrigin;
use axum::http::{HeaderMap, HeaderName, Uri, header};
use serde_json::json;

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Extracts the scheme and authority the client used to reach this service.
///
/// The authority comes from the `Host` header, falling back to the request URI
/// authority (HTTP/2). The scheme comes from the request URI and defaults to
/// `http`, since HTTP/1 requests carry only a path.
///
/// When `behind_proxy` is true, `X-Forwarded-Host` and `X-Forwarded-Proto`
/// take precedence. Only the first entry of a comma-separated list is used.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no authority can be determined or the
/// `Host` header contains invalid UTF-8.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// let origin = extract_request_origin(&headers, &"/fw/abc".parse().unwrap(), false).unwrap();
/// assert_eq!(origin.base_url(), "http://s.example.com:8080");
/// ```
pub fn extract_request_origin(
    headers: &HeaderMap,
    uri: &Uri,
    behind_proxy: bool,
) -> Result<RequestOrigin, AppError> {
    let forwarded_host = behind_proxy
        .then(|| first_header_value(headers, &X_FORWARDED_HOST))
        .flatten();

    let authority = match forwarded_host {
        Some(host) => host.to_string(),
        None => match headers.get(header::HOST) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
                .trim()
                .to_string(),
            None => uri
                .authority()
                .map(|a| a.as_str().to_string())
                .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?,
        },
    };

    if authority.is_empty() {
        return Err(AppError::bad_request("Missing Host header", json!({})));
    }

    let forwarded_proto = behind_proxy
        .then(|| first_header_value(headers, &X_FORWARDED_PROTO))
        .flatten();

    let scheme = forwarded_proto
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");

    Ok(RequestOrigin::new(&authority, scheme))
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn path_uri() -> Uri {
        Uri::from_static("/fw/abc")
    }

    #[test]
    fn test_origin_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("s.example.com"));

        let origin = extract_request_origin(&headers, &path_uri(), false).unwrap();
        assert_eq!(origin.host(), "s.example.com");
        assert_eq!(origin.scheme(), "http");
        assert_eq!(origin.port(), None);
    }

    #[test]
    fn test_origin_keeps_custom_port() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));

        let origin = extract_request_origin(&headers, &path_uri(), false).unwrap();
        assert_eq!(origin.authority(), "localhost:3000");
    }

    #[test]
    fn test_origin_from_absolute_uri() {
        let headers = HeaderMap::new();
        let uri = Uri::from_static("https://s.example.com/fw/abc");

        let origin = extract_request_origin(&headers, &uri, false).unwrap();
        assert_eq!(origin.base_url(), "https://s.example.com");
    }

    #[test]
    fn test_forwarded_headers_ignored_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("s.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));

        let origin = extract_request_origin(&headers, &path_uri(), false).unwrap();
        assert_eq!(origin.base_url(), "http://internal:8080");
    }

    #[test]
    fn test_forwarded_headers_used_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
        headers.insert(
            "x-forwarded-host",
            HeaderValue::from_static("s.example.com, proxy.local"),
        );
        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS"));

        let origin = extract_request_origin(&headers, &path_uri(), true).unwrap();
        assert_eq!(origin.base_url(), "https://s.example.com");
    }

    #[test]
    fn test_proxy_without_forwarded_headers_falls_back_to_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("s.example.com"));

        let origin = extract_request_origin(&headers, &path_uri(), true).unwrap();
        assert_eq!(origin.base_url(), "http://s.example.com");
    }

    #[test]
    fn test_missing_host_is_error() {
        let headers = HeaderMap::new();
        assert!(extract_request_origin(&headers, &path_uri(), false).is_err());
    }

    #[test]
    fn test_invalid_utf8_host_is_error() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE]) {
            headers.insert(header::HOST, value);
            assert!(extract_request_origin(&headers, &path_uri(), false).is_err());
        }
    }
}
