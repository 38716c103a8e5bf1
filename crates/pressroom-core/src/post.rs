//! Post: content optionally owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::{User, UserId};

/// Storage-assigned post identifier.
pub type PostId = i64;

/// A persisted post.
///
/// `user_id` is `None` for ownerless posts, including posts whose owner has
/// since been soft-deleted. `user` is only populated by
/// [`crate::repository::PostRepository::find_by_user_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         PostId,
  pub title:      String,
  pub content:    String,
  pub user_id:    Option<UserId>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user:       Option<User>,
}

impl Post {
  pub fn is_active(&self) -> bool { self.deleted_at.is_none() }

  pub fn fields(&self) -> NewPost {
    NewPost {
      title:   self.title.clone(),
      content: self.content.clone(),
      user_id: self.user_id,
    }
  }
}

/// Input to [`crate::repository::PostRepository::create`] and
/// [`crate::repository::PostRepository::update`].
///
/// An owner that does not resolve to an active user is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
  #[serde(default)]
  pub title:   String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub user_id: Option<UserId>,
}

impl NewPost {
  /// Convenience constructor for an untitled post.
  pub fn new(content: impl Into<String>, user_id: Option<UserId>) -> Self {
    Self {
      title: String::new(),
      content: content.into(),
      user_id,
    }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }
}
