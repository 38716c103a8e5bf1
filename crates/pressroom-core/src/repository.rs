//! The `UserRepository` and `PostRepository` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `pressroom-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Every read filters out soft-deleted rows. Mutations are single
//! transactions; `delete` never physically removes a row.
//!
//! A [`crate::Error::Timeout`] means the caller stopped waiting, not that the
//! write was rolled back: the mutation may still have committed.

use std::future::Future;

use crate::{
  patch::{PostPatch, UserPatch},
  post::{NewPost, Post, PostId},
  user::{NewUser, User, UserId},
};

/// Abstraction over a user store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// A mutation that fails with a timeout may still have been applied; re-read
/// before retrying.
pub trait UserRepository: Send + Sync {
  /// Backend error; must classify into the shared [`crate::Error`] taxonomy.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// All active users in insertion order.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// The active user with this id; not found if absent or soft-deleted.
  fn find_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Insert a new user. Fails with a conflict if the email is already used by
  /// another active user.
  fn create(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Replace every mutable field of an active user.
  fn update(
    &self,
    id: UserId,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Merge the supplied fields into an active user and return the row as
  /// persisted.
  fn partial_update(
    &self,
    id: UserId,
    patch: UserPatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Soft-delete a user. Deleting an already-deleted user succeeds. Posts
  /// owned by the user lose their owner.
  fn delete(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Clear the soft-delete marker. Restoring an active user is a no-op.
  fn restore(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Abstraction over a post store. Same shape as [`UserRepository`] plus
/// [`PostRepository::find_by_user_id`]. Timeouts carry the same caveat: the
/// write may have been applied.
pub trait PostRepository: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn find_by_id(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// All active posts owned by `user_id`, each with its owner attached in
  /// [`Post::user`]. Empty if the user is unknown or deleted.
  fn find_by_user_id(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Insert a new post. An owner that is not an active user is stored as
  /// `None`.
  fn create(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn update(
    &self,
    id: PostId,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn partial_update(
    &self,
    id: PostId,
    patch: PostPatch,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn delete(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn restore(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
