//! Axum routes for the user resource
//!
//! Bodies are read as raw bytes and decoded here, so an empty body, a literal
//! `null` and malformed JSON all become a bodiless 400 instead of the
//! extractor's default rejection. A patch body only has to be a JSON array;
//! its operations are checked when the patch is applied.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiOperation};
use super::users::{Replaced, UserCreated, UserPage};
use crate::{
    health,
    ids::UserId,
    models::{CreateUser, UpdateUser, UserView},
    pagination::ListQuery,
    patch::PatchDocument,
    repository::UserRepository,
    responses::{AllowedMethods, NoContent},
    state::AppState,
};

/// Build the service router
///
/// | Path | Methods |
/// |---|---|
/// | `/users` | GET, POST, OPTIONS |
/// | `/users/{id}` | GET, HEAD, PUT, PATCH, DELETE, OPTIONS |
/// | `/health` | GET |
/// | `/ready` | GET |
pub fn router<R>(state: AppState<R>) -> Router
where
    R: UserRepository + 'static,
{
    Router::new()
        .route(
            "/users",
            get(list_users::<R>)
                .post(create_user::<R>)
                .options(collection_options),
        )
        .route(
            "/users/{id}",
            get(get_user::<R>)
                .head(head_user::<R>)
                .put(replace_user::<R>)
                .patch(patch_user::<R>)
                .delete(delete_user::<R>)
                .options(item_options),
        )
        .route("/health", get(health::health::<R>))
        .route("/ready", get(health::readiness::<R>))
        .with_state(state)
}

/// Decode an optional JSON body
///
/// Empty and `null` bodies decode to `None`.
fn parse_body<T: DeserializeOwned>(
    body: &[u8],
    operation: ApiOperation,
) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(body).map_err(|e| {
        ApiError::bad_request(format!("Malformed JSON body: {}", e)).with_operation(operation)
    })
}

fn parse_id(raw: &str, operation: ApiOperation) -> Result<UserId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::bad_request(format!("'{}' is not a valid user id", raw))
            .with_operation(operation)
            .with_entity_id(raw)
    })
}

async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<UserPage, ApiError> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!("Ignoring unparseable list query: {}", rejection);
            ListQuery::default()
        }
    };
    state.users().list(query).await
}

async fn create_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<UserCreated, ApiError> {
    let payload = parse_body::<CreateUser>(&body, ApiOperation::Create)?;
    state.users().create(payload).await
}

async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let id = parse_id(&id, ApiOperation::Get)?;
    state.users().get(id).await.map(Json)
}

async fn head_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    let id = parse_id(&id, ApiOperation::Exists)?;
    state.users().exists(id).await
}

async fn replace_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Replaced, ApiError> {
    let id = parse_id(&id, ApiOperation::Replace)?;
    let payload = parse_body::<UpdateUser>(&body, ApiOperation::Replace)?;
    state.users().replace(id, payload).await
}

async fn patch_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<NoContent, ApiError> {
    let id = parse_id(&id, ApiOperation::Patch)?;
    let patch = parse_body::<PatchDocument>(&body, ApiOperation::Patch)?;
    state.users().patch(id, patch).await?;
    Ok(NoContent)
}

async fn delete_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<NoContent, ApiError> {
    let id = parse_id(&id, ApiOperation::Delete)?;
    state.users().delete(id).await?;
    Ok(NoContent)
}

async fn collection_options() -> AllowedMethods {
    AllowedMethods::COLLECTION
}

async fn item_options() -> AllowedMethods {
    AllowedMethods::ITEM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiErrorKind;

    #[test]
    fn test_parse_body_empty_and_null() {
        let parsed = parse_body::<CreateUser>(b"", ApiOperation::Create).unwrap();
        assert!(parsed.is_none());
        let parsed = parse_body::<CreateUser>(b"  \n", ApiOperation::Create).unwrap();
        assert!(parsed.is_none());
        let parsed = parse_body::<CreateUser>(b"null", ApiOperation::Create).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_body_malformed() {
        let err = parse_body::<CreateUser>(b"{\"login\":", ApiOperation::Create).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);

        let err = parse_body::<PatchDocument>(b"{\"op\":\"replace\"}", ApiOperation::Patch)
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.operation, ApiOperation::Patch);

        let parsed = parse_body::<PatchDocument>(br#"[{"op":"frobnicate"}]"#, ApiOperation::Patch)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_body_value() {
        let parsed = parse_body::<CreateUser>(br#"{"login":"jdoe"}"#, ApiOperation::Create)
            .unwrap()
            .unwrap();
        assert_eq!(parsed, CreateUser::new("jdoe"));
    }

    #[test]
    fn test_parse_id() {
        let id = UserId::new();
        assert_eq!(parse_id(&id.to_string(), ApiOperation::Get).unwrap(), id);

        let err = parse_id("not-a-uuid", ApiOperation::Delete).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.entity_id.as_deref(), Some("not-a-uuid"));
    }
}
