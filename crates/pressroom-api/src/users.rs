//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | All active users |
//! | `POST`   | `/users` | Body: [`NewUser`]; returns 201 + stored user |
//! | `GET`    | `/users/:id` | 404 if absent or deleted |
//! | `PUT`    | `/users/:id` | Body: [`NewUser`]; full replace |
//! | `PATCH`  | `/users/:id` | Body: any subset of `firstname`, `lastname`, `email` |
//! | `DELETE` | `/users/:id` | Soft delete; idempotent |
//! | `POST`   | `/users/:id/restore` | Clears the soft-delete marker |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use pressroom_core::{
  patch::{FieldMap, UserPatch},
  repository::UserRepository,
  user::{NewUser, User, UserId},
};

use crate::{Message, error::ApiError};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<R: UserRepository>(
  State(repo): State<Arc<R>>,
) -> Result<Json<Vec<User>>, ApiError> {
  let users = repo.find_all().await.map_err(ApiError::repository)?;
  tracing::debug!(user_count = users.len(), "fetched users");
  Ok(Json(users))
}

/// `GET /users/:id`
pub async fn get_one<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  let user = repo.find_by_id(id).await.map_err(ApiError::repository)?;
  Ok(Json(user))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /users`: returns 201 + the stored [`User`].
pub async fn create<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
  body.validate()?;
  let user = repo.create(body).await.map_err(ApiError::repository)?;
  tracing::debug!(user_id = user.id, "created user");
  Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/:id`
pub async fn update<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<UserId>,
  Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
  body.validate()?;
  let user = repo.update(id, body).await.map_err(ApiError::repository)?;
  tracing::debug!(user_id = id, "updated user");
  Ok(Json(user))
}

/// `PATCH /users/:id`: returns the user as persisted after the merge.
pub async fn patch<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<UserId>,
  Json(fields): Json<FieldMap>,
) -> Result<Json<User>, ApiError> {
  let patch = UserPatch::from_fields(fields)?;
  patch.validate()?;
  let user = repo
    .partial_update(id, patch)
    .await
    .map_err(ApiError::repository)?;
  tracing::debug!(user_id = id, "partially updated user");
  Ok(Json(user))
}

/// `DELETE /users/:id`
pub async fn delete<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<UserId>,
) -> Result<Json<Message>, ApiError> {
  repo.delete(id).await.map_err(ApiError::repository)?;
  tracing::debug!(user_id = id, "deleted user");
  Ok(Json(Message::new("User deleted")))
}

/// `POST /users/:id/restore`
pub async fn restore<R: UserRepository>(
  State(repo): State<Arc<R>>,
  Path(id): Path<UserId>,
) -> Result<Json<Message>, ApiError> {
  repo.restore(id).await.map_err(ApiError::repository)?;
  tracing::debug!(user_id = id, "restored user");
  Ok(Json(Message::new("User restored")))
}
