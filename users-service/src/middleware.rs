//! Request tracking middleware
//!
//! Every request gets an `x-request-id` (a UUID unless the caller sent one),
//! which is echoed on the response. Credentials in request headers are marked
//! sensitive so the trace layer does not log them.

use http::HeaderName;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::config::RequestTrackingConfig;

/// Default request ID header
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Header carrying the request ID, falling back to `x-request-id` when the
/// configured name is not a valid header name
pub fn request_id_header(config: &RequestTrackingConfig) -> HeaderName {
    HeaderName::try_from(config.request_id_header.to_ascii_lowercase()).unwrap_or_else(|_| {
        tracing::warn!(
            "Invalid request ID header '{}', using {}",
            config.request_id_header,
            REQUEST_ID_HEADER
        );
        HeaderName::from_static(REQUEST_ID_HEADER)
    })
}

/// Create a request ID layer that generates UUID request IDs
pub fn request_id_layer(header: HeaderName) -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header, MakeRequestUuid)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer(header: HeaderName) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header)
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
