//! Error taxonomy shared by every repository backend.
//!
//! Backends keep their own error types and convert into [`Error`] so the
//! boundary can map each [`ErrorKind`] onto a response consistently.

use serde::Serialize;
use thiserror::Error;

use crate::{post::PostId, user::UserId};

/// The coarse category of a repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Conflict,
  ValidationFailed,
  StorageUnavailable,
  Timeout,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("post not found: {0}")]
  PostNotFound(PostId),

  /// A uniqueness rule was violated, e.g. an email already in active use.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("validation failed: {0}")]
  ValidationFailed(String),

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("storage operation timed out")]
  Timeout,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UserNotFound(_) | Self::PostNotFound(_) => ErrorKind::NotFound,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
      Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
      Self::Timeout => ErrorKind::Timeout,
    }
  }

  pub(crate) fn invalid(message: impl Into<String>) -> Self {
    Self::ValidationFailed(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
