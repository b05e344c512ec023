//! HTTP response builders with correct status codes
//!
//! ## Status Codes Provided
//!
//! - **200 OK** - A page of items with pagination metadata in a header ([`Paginated`]),
//!   or an empty body advertising the allowed methods ([`AllowedMethods`])
//! - **201 Created** - Resource created, with a `Location` header ([`Created`])
//! - **204 No Content** - Successful operation with no response body ([`NoContent`])

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pagination::{PaginationMeta, PAGINATION_HEADER};

// ============================================================================
// 201 Created
// ============================================================================

/// HTTP 201 Created response
///
/// Optionally includes a `Location` header pointing to the new resource.
///
/// # Example
///
/// ```rust
/// use axum::response::IntoResponse;
/// use users_service::responses::Created;
///
/// let response = Created::new("6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f")
///     .with_location("/users/6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f")
///     .into_response();
/// assert_eq!(response.status().as_u16(), 201);
/// ```
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

// ============================================================================
// 204 No Content
// ============================================================================

/// HTTP 204 No Content response
#[derive(Debug, Clone, Copy)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

// ============================================================================
// 200 OK with pagination metadata
// ============================================================================

/// One page of items
///
/// The body is the bare JSON array. The metadata travels as a JSON document in
/// the `x-pagination` header.
#[derive(Debug)]
pub struct Paginated<T> {
    items: Vec<T>,
    meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, meta: PaginationMeta) -> Self {
        Self { items, meta }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(&self.items)).into_response();

        match serde_json::to_string(&self.meta) {
            Ok(meta) => {
                if let Ok(header_value) = HeaderValue::from_str(&meta) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(PAGINATION_HEADER), header_value);
                }
            }
            Err(e) => tracing::error!("Failed to serialize pagination metadata: {}", e),
        }

        response
    }
}

// ============================================================================
// 200 OK for OPTIONS
// ============================================================================

/// Empty 200 response listing the methods a resource supports in `Allow`
#[derive(Debug, Clone, Copy)]
pub struct AllowedMethods(pub &'static str);

impl AllowedMethods {
    /// Methods of the user collection
    pub const COLLECTION: Self = Self("GET,POST,OPTIONS");
    /// Methods of a single user
    pub const ITEM: Self = Self("GET,HEAD,PUT,PATCH,DELETE,OPTIONS");
}

impl IntoResponse for AllowedMethods {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::ALLOW, HeaderValue::from_static(self.0))],
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_response() {
        let response = Created::new("abc").with_location("/users/abc").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/users/abc");
    }

    #[test]
    fn test_created_without_location() {
        let response = Created::new("abc").into_response();
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_no_content_response() {
        let response = NoContent.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_paginated_response() {
        let meta = PaginationMeta::new(1, 2, 3, "");
        let response = Paginated::new(vec![1, 2], meta.clone()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let header = response.headers()[PAGINATION_HEADER].to_str().unwrap().to_string();
        let parsed: PaginationMeta = serde_json::from_str(&header).unwrap();
        assert_eq!(parsed, meta);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"[1,2]");
    }

    #[test]
    fn test_allowed_methods() {
        let response = AllowedMethods::ITEM.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ALLOW],
            "GET,HEAD,PUT,PATCH,DELETE,OPTIONS"
        );
        assert_eq!(
            AllowedMethods::COLLECTION.into_response().headers()[header::ALLOW],
            "GET,POST,OPTIONS"
        );
    }
}
