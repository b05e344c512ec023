//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    handlers::UsersHandler,
    repository::{InMemoryUserRepository, UserRepository},
};

/// Application state shared across handlers
///
/// The store is created once at startup and reached through the handler held
/// here; there is no process-wide repository.
pub struct AppState<R = InMemoryUserRepository> {
    config: Arc<Config>,
    users: Arc<UsersHandler<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            users: Arc::clone(&self.users),
        }
    }
}

impl AppState<InMemoryUserRepository> {
    /// Create state backed by an empty in-memory store
    pub fn new(config: Config) -> Self {
        Self::with_repository(config, InMemoryUserRepository::new())
    }
}

impl Default for AppState<InMemoryUserRepository> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<R: UserRepository> AppState<R> {
    /// Create state over an existing repository
    pub fn with_repository(config: Config, repository: R) -> Self {
        let users = UsersHandler::new(repository)
            .with_create_profile(config.validation.create_profile())
            .with_base_path(config.service.base_path.clone());

        Self {
            config: Arc::new(config),
            users: Arc::new(users),
        }
    }
}

impl<R> AppState<R> {
    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the user handler
    pub fn users(&self) -> &UsersHandler<R> {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;

    #[tokio::test]
    async fn test_clones_share_repository() {
        let state = AppState::default();
        let clone = state.clone();

        let created = state
            .users()
            .create(Some(CreateUser::new("jdoe")))
            .await
            .unwrap();

        assert!(clone.users().repository().exists(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_handler_follows_config() {
        let mut config = Config::default();
        config.service.base_path = "/api".to_string();
        config.validation.require_names_on_create = true;
        let state = AppState::new(config);

        assert!(state
            .users()
            .create(Some(CreateUser::new("jdoe")))
            .await
            .is_err());

        let created = state
            .users()
            .create(Some(CreateUser::new("jdoe").with_names("John", "Doe")))
            .await
            .unwrap();
        assert_eq!(created.location, format!("/api/users/{}", created.id));
        assert_eq!(state.config().service.base_path, "/api");
    }
}
