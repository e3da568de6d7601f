//! Caller IP extraction.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, request::Parts},
};

/// Determines the caller's address.
///
/// Order: first `X-Forwarded-For` entry, `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded
        .or_else(|| {
            headers
                .get("X-Real-IP")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        })
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
}

/// Extractor for the caller's IP; `None` when it cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(&parts.headers, &parts.extensions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let h = headers(&[("x-forwarded-for", "81.2.69.142, 10.0.0.1")]);
        assert_eq!(
            client_ip(&h, &Extensions::new()),
            Some("81.2.69.142".parse().unwrap())
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let h = headers(&[("x-forwarded-for", "garbage"), ("x-real-ip", "2001:db8::1")]);
        assert_eq!(
            client_ip(&h, &Extensions::new()),
            Some("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn test_connect_info_fallback() {
        let mut ext = Extensions::new();
        ext.insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 5555))));
        assert_eq!(
            client_ip(&HeaderMap::new(), &ext),
            Some("192.0.2.7".parse().unwrap())
        );
    }

    #[test]
    fn test_no_source() {
        assert_eq!(client_ip(&HeaderMap::new(), &Extensions::new()), None);
    }
}
