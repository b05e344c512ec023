//! # users-service
//!
//! HTTP service exposing a `user` resource: create, full replace (upsert),
//! JSON Patch partial update, lookup, existence check, delete and a paginated
//! listing. Users live in a memory-resident store guarded by a single lock.
//!
//! ## Features
//!
//! - **Validation**: field-level errors accumulated per request and returned as a 422 body
//! - **Partial updates**: JSON Patch applied to a projection, written back only when valid
//! - **Pagination**: clamped page parameters, metadata in the `x-pagination` header
//! - **Middleware stack**: request IDs, panic recovery, body size limits, timeouts, CORS
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use users_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app = router(AppState::new(config.clone()));
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod patch;
pub mod repository;
pub mod responses;
pub mod server;
pub mod state;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{router, ApiError, ApiErrorKind, UsersHandler};
    pub use crate::health::{health, readiness};
    pub use crate::ids::UserId;
    pub use crate::models::{CreateUser, UpdateUser, UserEntity, UserView};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{ListQuery, PaginationMeta};
    pub use crate::patch::{PatchDocument, PatchOperation};
    pub use crate::repository::{InMemoryUserRepository, UserRepository};
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::validation::{ValidationErrors, ValidationProfile};
}
