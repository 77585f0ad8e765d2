//! Request-metadata extractor.
//!
//! Captures the ambient per-request metadata into an immutable
//! [`RequestMeta`] snapshot at the moment the handler runs. The snapshot
//! is what travels into the ingestion worker task, so this extractor is
//! the capture side of the context propagation described in
//! `actionlog_service::context`.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use actionlog_service::context::{RequestMeta, client_origin, or_unknown};

/// Extractor wrapping a captured [`RequestMeta`] snapshot.
///
/// Infallible: absent headers resolve to the `"Unknown"` sentinel so the
/// ingestion path never rejects a request over missing metadata.
#[derive(Debug, Clone)]
pub struct RequestMetadata(pub RequestMeta);

impl<S> FromRequestParts<S> for RequestMetadata
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer_address = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string());

        let headers = &parts.headers;
        let meta = RequestMeta {
            origin_address: client_origin(
                header_str(headers, "x-forwarded-for"),
                peer_address.as_deref(),
            ),
            url_name: parts.uri.path().to_string(),
            user_agent: or_unknown(header_str(headers, "user-agent")),
            referrer: or_unknown(header_str(headers, "referer")),
            locale: or_unknown(header_str(headers, "accept-language")),
            platform: or_unknown(header_str(headers, "x-platform")),
            app_version: or_unknown(header_str(headers, "x-app-version")),
            os_version: or_unknown(header_str(headers, "x-os-version")),
            device_model: or_unknown(header_str(headers, "x-device-model")),
            screen_descriptor: or_unknown(header_str(headers, "x-screen")),
        };

        Ok(Self(meta))
    }
}

/// Read a header as UTF-8, treating non-UTF-8 values as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestMeta {
        let (mut parts, _) = request.into_parts();
        let RequestMetadata(meta) = RequestMetadata::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        meta
    }

    #[tokio::test]
    async fn test_captures_headers_and_path() {
        let request = Request::builder()
            .uri("/action-log")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.2")
            .header("user-agent", "Mozilla/5.0")
            .header("accept-language", "ko-KR")
            .header("x-platform", "ios")
            .body(())
            .unwrap();

        let meta = extract(request).await;
        assert_eq!(meta.origin_address, "203.0.113.9");
        assert_eq!(meta.url_name, "/action-log");
        assert_eq!(meta.user_agent, "Mozilla/5.0");
        assert_eq!(meta.locale, "ko-KR");
        assert_eq!(meta.platform, "ios");
    }

    #[tokio::test]
    async fn test_absent_headers_resolve_to_unknown() {
        let request = Request::builder().uri("/action-log").body(()).unwrap();

        let meta = extract(request).await;
        assert_eq!(meta.origin_address, "Unknown");
        assert_eq!(meta.user_agent, "Unknown");
        assert_eq!(meta.referrer, "Unknown");
        assert_eq!(meta.device_model, "Unknown");
    }
}
