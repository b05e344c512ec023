//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{repository::UserRepository, state::AppState};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe
///
/// Always returns 200 OK while the process is serving requests.
pub async fn health<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: UserRepository + 'static,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Returns 200 OK when the user store answers, 503 otherwise.
pub async fn readiness<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: UserRepository + 'static,
{
    let mut dependencies = HashMap::new();

    let store = match state.users().repository().total_count().await {
        Ok(count) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} users", count)),
        },
        Err(e) => {
            tracing::warn!("User store not ready: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(e.to_string()),
            }
        }
    };
    let ready = store.healthy;
    dependencies.insert("user_store".to_string(), store);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Response;

    async fn json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = health(State(AppState::default())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "users-service");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_readiness() {
        let response = readiness(State(AppState::default())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["dependencies"]["user_store"]["healthy"], true);
    }
}
