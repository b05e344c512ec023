//! HTTP handlers for the user resource
//!
//! - [`UsersHandler`]: per-verb orchestration over a [`UserRepository`](crate::repository::UserRepository)
//! - [`router`]: axum routes wiring the handler to HTTP
//! - [`ApiError`]: failures with automatic HTTP status code mapping
//!
//! # Integration with Axum
//!
//! ```rust
//! use users_service::{config::Config, handlers::router, state::AppState};
//!
//! let app: axum::Router = router(AppState::new(Config::default()));
//! ```

mod error;
mod routes;
mod users;

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use routes::router;
pub use users::{Replaced, UserCreated, UserPage, UsersHandler};
