//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | All active posts |
//! | `POST`   | `/posts` | Body: [`NewPost`]; returns 201 + stored post |
//! | `GET`    | `/posts/:id` | 404 if absent or deleted |
//! | `GET`    | `/posts/user/:user_id` | Owned posts with the owner attached |
//! | `PUT`    | `/posts/:id` | Body: [`NewPost`]; full replace |
//! | `PATCH`  | `/posts/:id` | Body: any subset of `title`, `content`, `user_id` |
//! | `DELETE` | `/posts/:id` | Soft delete; idempotent |
//! | `POST`   | `/posts/:id/restore` | Clears the soft-delete marker |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use pressroom_core::{
  patch::{FieldMap, PostPatch},
  post::{NewPost, Post, PostId},
  repository::PostRepository,
  user::UserId,
};

use crate::{Message, error::ApiError};

/// `GET /posts`
pub async fn list<R: PostRepository>(
  State(repo): State<Arc<R>>,
) -> Result<Json<Vec<Post>>, ApiError> {
  let posts = repo.find_all().await.map_err(ApiError::repository)?;
  tracing::debug!(post_count = posts.len(), "fetched posts");
  Ok(Json(posts))
}

/// `GET /posts/:id`
pub async fn get_one<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<PostId>,
) -> Result<Json<Post>, ApiError> {
  let post = repo.find_by_id(id).await.map_err(ApiError::repository)?;
  Ok(Json(post))
}

/// `GET /posts/user/:user_id`
pub async fn list_by_user<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Post>>, ApiError> {
  let posts = repo
    .find_by_user_id(user_id)
    .await
    .map_err(ApiError::repository)?;
  tracing::debug!(user_id, post_count = posts.len(), "fetched posts by user");
  Ok(Json(posts))
}

/// `POST /posts`: returns 201 + the stored [`Post`].
pub async fn create<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Json(body): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError> {
  let post = repo.create(body).await.map_err(ApiError::repository)?;
  tracing::debug!(post_id = post.id, "created post");
  Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /posts/:id`
pub async fn update<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<PostId>,
  Json(body): Json<NewPost>,
) -> Result<Json<Post>, ApiError> {
  let post = repo.update(id, body).await.map_err(ApiError::repository)?;
  tracing::debug!(post_id = id, "updated post");
  Ok(Json(post))
}

/// `PATCH /posts/:id`; `{"user_id": null}` detaches the post from its owner.
pub async fn patch<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<PostId>,
  Json(fields): Json<FieldMap>,
) -> Result<Json<Post>, ApiError> {
  let patch = PostPatch::from_fields(fields)?;
  let post = repo
    .partial_update(id, patch)
    .await
    .map_err(ApiError::repository)?;
  tracing::debug!(post_id = id, "partially updated post");
  Ok(Json(post))
}

/// `DELETE /posts/:id`
pub async fn delete<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<PostId>,
) -> Result<Json<Message>, ApiError> {
  repo.delete(id).await.map_err(ApiError::repository)?;
  tracing::debug!(post_id = id, "deleted post");
  Ok(Json(Message::new("Post deleted")))
}

/// `POST /posts/:id/restore`
pub async fn restore<R: PostRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<PostId>,
) -> Result<Json<Message>, ApiError> {
  repo.restore(id).await.map_err(ApiError::repository)?;
  tracing::debug!(post_id = id, "restored post");
  Ok(Json(Message::new("Post restored")))
}
