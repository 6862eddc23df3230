use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use std::convert::Infallible;
use std::net::SocketAddr;
use util::config;

use crate::auth::{claims::AuthUser, decode_jwt};

/// Extracts `AuthUser` by verifying the bearer token's signature and expiry.
///
/// This does not consult the token store; routes mounted behind
/// `allow_authenticated` get the stronger, revocation-aware check and read the
/// user from request extensions instead.
///
/// # Errors
/// - `401 Unauthorized` if the header is missing, malformed, or the token is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?;

        let claims = decode_jwt(&token)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser(claims))
    }
}

/// Raw bearer token from the `Authorization` header, if present.
pub async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_owned())
}

/// Client address used for throttling and audit entries.
///
/// The socket peer address is authoritative. `X-Forwarded-For` is read only when
/// that peer is listed in `TRUSTED_PROXIES`, in which case its first hop wins.
/// Without connection info (as in tests driven through `oneshot`) the address
/// is `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(peer) = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
        else {
            return Ok(ClientIp("unknown".into()));
        };

        if !config::is_trusted_proxy(&peer) {
            return Ok(ClientIp(peer));
        }

        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        Ok(ClientIp(forwarded.unwrap_or(peer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serial_test::serial;
    use util::config::AppConfig;

    async fn client_ip(req: Request<()>) -> String {
        let (mut parts, _) = req.into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        ip
    }

    fn from_peer(peer: &str, forwarded: Option<&str>) -> Request<()> {
        let mut builder = Request::builder();
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        req
    }

    #[tokio::test]
    #[serial]
    async fn forwarded_header_is_ignored_from_untrusted_peers() {
        AppConfig::set_trusted_proxies(vec![]);
        let req = from_peer("203.0.113.7:5000", Some("10.1.1.1"));
        assert_eq!(client_ip(req).await, "203.0.113.7");
    }

    #[tokio::test]
    #[serial]
    async fn trusted_proxy_forwards_first_hop() {
        AppConfig::set_trusted_proxies(vec!["127.0.0.1".into()]);

        let req = from_peer("127.0.0.1:5000", Some("10.1.1.1, 192.168.0.1"));
        assert_eq!(client_ip(req).await, "10.1.1.1");

        let req = from_peer("127.0.0.1:5000", None);
        assert_eq!(client_ip(req).await, "127.0.0.1");

        AppConfig::set_trusted_proxies(vec![]);
    }

    #[tokio::test]
    #[serial]
    async fn missing_connection_info_is_unknown() {
        let req = Request::builder()
            .header("x-forwarded-for", "10.1.1.1")
            .body(())
            .unwrap();
        assert_eq!(client_ip(req).await, "unknown");
    }
}
