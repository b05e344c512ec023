//! Per-verb orchestration of the user resource
//!
//! [`UsersHandler`] sits between the HTTP routes and the repository. Each
//! method validates its input, drives the repository and returns either a
//! success outcome or an [`ApiError`] that already knows its status code.

use axum::response::{IntoResponse, Response};
use tracing::instrument;

use super::error::{ApiError, ApiOperation};
use crate::ids::UserId;
use crate::models::{CreateUser, UpdateUser, UserView};
use crate::pagination::{ListQuery, PaginationMeta};
use crate::patch::PatchDocument;
use crate::repository::UserRepository;
use crate::responses::{Created, NoContent, Paginated};
use crate::validation::ValidationProfile;

/// A user was stored under a new id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreated {
    pub id: UserId,
    pub location: String,
}

impl IntoResponse for UserCreated {
    fn into_response(self) -> Response {
        Created::new(self.id).with_location(self.location).into_response()
    }
}

/// Outcome of a full replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replaced {
    /// No user had the id; one was inserted under it
    Inserted(UserCreated),
    /// An existing user was overwritten
    Updated,
}

impl IntoResponse for Replaced {
    fn into_response(self) -> Response {
        match self {
            Self::Inserted(created) => created.into_response(),
            Self::Updated => NoContent.into_response(),
        }
    }
}

/// One page of the user listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub items: Vec<UserView>,
    pub meta: PaginationMeta,
}

impl IntoResponse for UserPage {
    fn into_response(self) -> Response {
        Paginated::new(self.items, self.meta).into_response()
    }
}

/// Orchestrates user operations over a repository
#[derive(Debug, Clone)]
pub struct UsersHandler<R> {
    repository: R,
    create_profile: ValidationProfile,
    base_path: String,
}

impl<R: UserRepository> UsersHandler<R> {
    /// Create a handler that validates creations with the minimal profile and
    /// builds links relative to the root
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            create_profile: ValidationProfile::Minimal,
            base_path: String::new(),
        }
    }

    /// Rules applied to create payloads
    #[must_use]
    pub fn with_create_profile(mut self, profile: ValidationProfile) -> Self {
        self.create_profile = profile;
        self
    }

    /// Prefix for `Location` headers and pagination links
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn location(&self, id: &UserId) -> String {
        format!("{}/users/{}", self.base_path, id)
    }

    /// Fetch one user
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self, id: UserId) -> Result<UserView, ApiError> {
        self.repository
            .find_by_id(&id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| ApiError::not_found(id.to_string()))
    }

    /// Same lookup as [`get`](Self::get) without the payload
    #[instrument(skip(self), level = "debug")]
    pub async fn exists(&self, id: UserId) -> Result<(), ApiError> {
        if self.repository.exists(&id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found(id.to_string()).with_operation(ApiOperation::Exists))
        }
    }

    /// Store a new user under a fresh id
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: Option<CreateUser>) -> Result<UserCreated, ApiError> {
        let payload = payload.ok_or_else(|| ApiError::bad_request("Request body is missing"))?;

        payload
            .validate(self.create_profile)
            .into_result()
            .map_err(ApiError::validation_failed)?;

        let stored = self.repository.insert(payload.into_entity()).await?;
        tracing::info!(id = %stored.id, login = %stored.login, "User created");

        Ok(UserCreated {
            location: self.location(&stored.id),
            id: stored.id,
        })
    }

    /// Overwrite the user with `id`, or insert one under that id
    #[instrument(skip(self, payload))]
    pub async fn replace(
        &self,
        id: UserId,
        payload: Option<UpdateUser>,
    ) -> Result<Replaced, ApiError> {
        if id.is_nil() {
            return Err(ApiError::bad_request("User id must not be nil")
                .with_operation(ApiOperation::Replace));
        }
        let payload = payload.ok_or_else(|| {
            ApiError::bad_request("Request body is missing").with_operation(ApiOperation::Replace)
        })?;

        payload.validate().into_result().map_err(|errors| {
            ApiError::validation_failed(errors)
                .with_operation(ApiOperation::Replace)
                .with_entity_id(id.to_string())
        })?;

        let inserted = self
            .repository
            .update_or_insert(payload.into_entity(id))
            .await?;

        if inserted {
            tracing::info!(%id, "User created by replace");
            Ok(Replaced::Inserted(UserCreated {
                location: self.location(&id),
                id,
            }))
        } else {
            tracing::info!(%id, "User replaced");
            Ok(Replaced::Updated)
        }
    }

    /// Apply a patch document to the user with `id`
    ///
    /// The patch is applied to a projection of the stored user. The stored user
    /// is only written once the projection passes full validation.
    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: UserId, patch: Option<PatchDocument>) -> Result<(), ApiError> {
        let patch = patch.ok_or_else(|| {
            ApiError::bad_request("Patch document is missing").with_operation(ApiOperation::Patch)
        })?;

        let existing = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ApiError::not_found(id.to_string()).with_operation(ApiOperation::Patch))?;

        let mut projection = UpdateUser::from(&existing);
        let mut errors = patch.apply_to(&mut projection);
        errors.merge(projection.validate());

        errors.into_result().map_err(|errors| {
            ApiError::validation_failed(errors)
                .with_operation(ApiOperation::Patch)
                .with_entity_id(id.to_string())
        })?;

        self.repository.update(projection.into_entity(id)).await?;
        tracing::info!(%id, operations = patch.len(), "User patched");
        Ok(())
    }

    /// Remove the user with `id`
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        if id.is_nil() {
            return Err(ApiError::bad_request("User id must not be nil")
                .with_operation(ApiOperation::Delete));
        }
        if !self.repository.delete(&id).await? {
            return Err(ApiError::not_found(id.to_string()).with_operation(ApiOperation::Delete));
        }
        tracing::info!(%id, "User deleted");
        Ok(())
    }

    /// One page of users plus its metadata
    #[instrument(skip(self), level = "debug")]
    pub async fn list(&self, query: ListQuery) -> Result<UserPage, ApiError> {
        let page_number = query.page_number();
        let page_size = query.page_size();

        let (users, total_count) = self
            .repository
            .get_page_with_count(page_number, page_size)
            .await?;
        let items = users.into_iter().map(UserView::from).collect();

        Ok(UserPage {
            items,
            meta: PaginationMeta::new(page_number, page_size, total_count, &self.base_path),
        })
    }
}
