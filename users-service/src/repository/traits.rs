//! Repository trait definitions
//!
//! The trait uses RPITIT (Return Position Impl Trait In Traits) so async
//! methods need no `async_trait` boxing. Implementations must be `Send + Sync`
//! because a single store is shared by every request handler.

use std::future::Future;

use super::error::RepositoryError;
use crate::ids::UserId;
use crate::models::UserEntity;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Authoritative collection of user records
///
/// Every method hands out copies; no caller holds a reference into the store.
/// Mutating operations are mutually exclusive with each other and with reads.
///
/// # Example
///
/// ```rust
/// use users_service::models::UserEntity;
/// use users_service::ids::UserId;
/// use users_service::repository::{InMemoryUserRepository, UserRepository};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = InMemoryUserRepository::new();
/// let stored = repo
///     .insert(UserEntity::new(UserId::nil(), "jdoe", "John", "Doe"))
///     .await
///     .unwrap();
///
/// assert!(!stored.id.is_nil());
/// assert!(repo.exists(&stored.id).await.unwrap());
/// # }
/// ```
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    ///
    /// Returns `Ok(None)` when no user has that id.
    fn find_by_id(
        &self,
        id: &UserId,
    ) -> impl Future<Output = RepositoryResult<Option<UserEntity>>> + Send;

    /// Check whether a user with this id is stored
    fn exists(&self, id: &UserId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Store a new user under a freshly generated id
    ///
    /// Any id carried by `user` is ignored. Returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` with `AlreadyExists` kind if the generated id
    /// collides with a stored one.
    fn insert(
        &self,
        user: UserEntity,
    ) -> impl Future<Output = RepositoryResult<UserEntity>> + Send;

    /// Replace the fields of an existing user
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` with `NotFound` kind if no user has `user.id`.
    fn update(&self, user: UserEntity) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Replace the user with the same id, or store it under that id
    ///
    /// Returns `true` when the user was inserted, `false` when an existing
    /// record was replaced.
    fn update_or_insert(
        &self,
        user: UserEntity,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Remove a user
    ///
    /// Returns `true` if a user was removed, `false` if none had that id.
    fn delete(&self, id: &UserId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// One page of users in insertion order
    ///
    /// `page_number` is 1-based. A page past the end is empty, not an error.
    fn get_page(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> impl Future<Output = RepositoryResult<Vec<UserEntity>>> + Send;

    /// Number of stored users
    fn total_count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// One page of users together with the number of stored users
    ///
    /// Both are read from the same snapshot, so the count always describes
    /// the collection the page was cut from.
    fn get_page_with_count(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> impl Future<Output = RepositoryResult<(Vec<UserEntity>, u64)>> + Send;
}
