//! Client address extraction from HTTP request headers.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the visitor's IP address.
///
/// When `behind_proxy` is set, the left-most `X-Forwarded-For` entry wins,
/// then `X-Real-IP`. Otherwise (and as a fallback) the socket peer address
/// is used. Returns an empty string when nothing is known.
///
/// Only enable `behind_proxy` when a trusted reverse proxy overwrites these
/// headers; clients can forge them otherwise.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_ip(&headers, None, true), "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or_else(|| header_str(headers, X_REAL_IP)) {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

/// Returns a header as trimmed, non-empty UTF-8, or `None`.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
