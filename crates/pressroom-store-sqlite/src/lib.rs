//! SQLite backend for the Pressroom repositories.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A single [`SqliteStore`] is opened once
//! and handed to each repository at construction time.

mod encode;
mod posts;
mod schema;
mod store;
mod users;

pub mod error;

pub use error::{Error, Result};
pub use posts::SqlitePostRepository;
pub use store::{DEFAULT_TIMEOUT, SqliteStore};
pub use users::SqliteUserRepository;
