//! Memory-resident user store
//!
//! The whole collection sits behind one [`tokio::sync::RwLock`]. Writers take
//! the lock exclusively, so `insert`, `update`, `update_or_insert` and `delete`
//! never interleave with each other or with reads.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{RepositoryResult, UserRepository};
use crate::ids::UserId;
use crate::models::UserEntity;
use crate::pagination;

const ENTITY_TYPE: &str = "User";

#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, UserEntity>,
    /// Ids in insertion order; drives pagination
    order: Vec<UserId>,
}

impl Store {
    fn push(&mut self, user: UserEntity) {
        self.order.push(user.id);
        self.users.insert(user.id, user);
    }

    fn page(&self, page_number: u32, page_size: u32) -> Vec<UserEntity> {
        let skip = usize::try_from(pagination::offset(page_number.max(1), page_size))
            .unwrap_or(usize::MAX);
        self.order
            .iter()
            .skip(skip)
            .take(page_size as usize)
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }

    fn count(&self) -> u64 {
        self.users.len() as u64
    }
}

/// Volatile user repository
///
/// Cloning is cheap and every clone shares the same collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-populated with `users`, keeping their ids
    pub fn with_users(users: impl IntoIterator<Item = UserEntity>) -> Self {
        let mut store = Store::default();
        for user in users {
            if !store.users.contains_key(&user.id) {
                store.push(user);
            }
        }
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self), level = "debug")]
    async fn find_by_id(&self, id: &UserId) -> RepositoryResult<Option<UserEntity>> {
        let store = self.inner.read().await;
        Ok(store.users.get(id).cloned())
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, id: &UserId) -> RepositoryResult<bool> {
        let store = self.inner.read().await;
        Ok(store.users.contains_key(id))
    }

    #[instrument(skip(self, user), fields(login = %user.login))]
    async fn insert(&self, mut user: UserEntity) -> RepositoryResult<UserEntity> {
        let mut store = self.inner.write().await;
        user.id = UserId::new();
        if store.users.contains_key(&user.id) {
            return Err(RepositoryError::already_exists(
                ENTITY_TYPE,
                user.id.to_string(),
            ));
        }
        store.push(user.clone());
        tracing::info!(id = %user.id, "User inserted");
        Ok(user)
    }

    #[instrument(skip(self, user), fields(id = %user.id))]
    async fn update(&self, user: UserEntity) -> RepositoryResult<()> {
        let mut store = self.inner.write().await;
        match store.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                tracing::info!("User updated");
                Ok(())
            }
            None => Err(RepositoryError::not_found(ENTITY_TYPE, user.id.to_string())
                .with_operation(RepositoryOperation::Update)),
        }
    }

    #[instrument(skip(self, user), fields(id = %user.id))]
    async fn update_or_insert(&self, user: UserEntity) -> RepositoryResult<bool> {
        let mut store = self.inner.write().await;
        if let Some(existing) = store.users.get_mut(&user.id) {
            *existing = user;
            tracing::info!("User replaced");
            return Ok(false);
        }
        store.push(user);
        tracing::info!("User inserted under caller-supplied id");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &UserId) -> RepositoryResult<bool> {
        let mut store = self.inner.write().await;
        if store.users.remove(id).is_none() {
            return Ok(false);
        }
        store.order.retain(|stored| stored != id);
        tracing::info!("User deleted");
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_page(&self, page_number: u32, page_size: u32) -> RepositoryResult<Vec<UserEntity>> {
        let store = self.inner.read().await;
        Ok(store.page(page_number, page_size))
    }

    #[instrument(skip(self), level = "debug")]
    async fn total_count(&self) -> RepositoryResult<u64> {
        let store = self.inner.read().await;
        Ok(store.count())
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_page_with_count(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> RepositoryResult<(Vec<UserEntity>, u64)> {
        let store = self.inner.read().await;
        Ok((store.page(page_number, page_size), store.count()))
    }
}
