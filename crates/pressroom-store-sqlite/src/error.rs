//! Error type for `pressroom-store-sqlite`.

use std::time::Duration;

use pressroom_core::{ErrorKind, post::PostId, user::UserId};
use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] pressroom_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("post not found: {0}")]
  PostNotFound(PostId),

  #[error("email {0:?} is already in use by an active user")]
  EmailTaken(String),

  #[error("storage operation exceeded {0:?}")]
  Timeout(Duration),
}

impl Error {
  /// Classify this error into the shared taxonomy.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Database(e) => classify_database(e),
      Self::DateParse(_) => ErrorKind::StorageUnavailable,
      Self::UserNotFound(_) | Self::PostNotFound(_) => ErrorKind::NotFound,
      Self::EmailTaken(_) => ErrorKind::Conflict,
      Self::Timeout(_) => ErrorKind::Timeout,
    }
  }

  /// Replace a unique-constraint violation with `conflict()`; any other error
  /// passes through unchanged.
  pub(crate) fn on_unique_violation(self, conflict: impl FnOnce() -> Self) -> Self {
    match &self {
      Self::Database(tokio_rusqlite::Error::Rusqlite(e)) if is_unique_violation(e) => {
        conflict()
      }
      _ => self,
    }
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == ErrorCode::ConstraintViolation
        && matches!(
          f.extended_code,
          ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
  )
}

fn classify_database(e: &tokio_rusqlite::Error) -> ErrorKind {
  let tokio_rusqlite::Error::Rusqlite(e) = e else {
    // Closed connection or a failure on the connection thread.
    return ErrorKind::StorageUnavailable;
  };
  if is_unique_violation(e) {
    return ErrorKind::Conflict;
  }
  match e {
    rusqlite::Error::SqliteFailure(f, _) => match f.code {
      ErrorCode::ConstraintViolation => ErrorKind::ValidationFailed,
      ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => ErrorKind::Timeout,
      _ => ErrorKind::StorageUnavailable,
    },
    _ => ErrorKind::StorageUnavailable,
  }
}

impl From<Error> for pressroom_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(e) => e,
      Error::UserNotFound(id) => Self::UserNotFound(id),
      Error::PostNotFound(id) => Self::PostNotFound(id),
      other => match other.kind() {
        ErrorKind::Conflict => Self::Conflict(other.to_string()),
        ErrorKind::ValidationFailed => Self::ValidationFailed(other.to_string()),
        ErrorKind::Timeout => Self::Timeout,
        ErrorKind::NotFound | ErrorKind::StorageUnavailable => {
          Self::StorageUnavailable(Box::new(other))
        }
      },
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
