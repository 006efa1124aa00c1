//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Error when reading a bearer credential
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing authorization header")]
    Missing,

    #[error("Invalid authorization format")]
    InvalidFormat,
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; an empty token is rejected.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::InvalidFormat)?;

    let (scheme, token) = value.split_once(' ').ok_or(BearerError::InvalidFormat)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(BearerError::InvalidFormat);
    }

    Ok(token)
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // First IP in the list is the original client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        let headers = with_authorization("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def.ghi"));

        let headers = with_authorization("bearer abc");
        assert_eq!(extract_bearer_token(&headers), Ok("abc"));
    }

    #[test]
    fn test_bearer_token_errors() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(BearerError::Missing)
        );
        assert_eq!(
            extract_bearer_token(&with_authorization("NotBearer token")),
            Err(BearerError::InvalidFormat)
        );
        assert_eq!(
            extract_bearer_token(&with_authorization("Bearer")),
            Err(BearerError::InvalidFormat)
        );
        assert_eq!(
            extract_bearer_token(&with_authorization("Bearer   ")),
            Err(BearerError::InvalidFormat)
        );
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }
}
