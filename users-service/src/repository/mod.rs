//! User storage
//!
//! - [`UserRepository`]: async trait every store implements
//! - [`InMemoryUserRepository`]: volatile store guarded by a single lock
//! - [`RepositoryError`]: structured failure with operation context

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryUserRepository;
pub use traits::{RepositoryResult, UserRepository};
