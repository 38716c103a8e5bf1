//! JSON REST API for Pressroom.
//!
//! Exposes an axum [`Router`] backed by any [`UserRepository`] and
//! [`PostRepository`]. TLS, request logging, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(pressroom_api::api_router(users.clone(), posts.clone()))
//! ```

pub mod error;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use pressroom_core::repository::{PostRepository, UserRepository};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Body returned by operations that have no entity to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub message: String,
}

impl Message {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

/// Build the `/users` routes for `repo`.
pub fn users_router<R>(repo: Arc<R>) -> Router<()>
where
  R: UserRepository + 'static,
{
  Router::new()
    .route("/users", get(users::list::<R>).post(users::create::<R>))
    .route(
      "/users/{id}",
      get(users::get_one::<R>)
        .put(users::update::<R>)
        .patch(users::patch::<R>)
        .delete(users::delete::<R>),
    )
    .route("/users/{id}/restore", post(users::restore::<R>))
    .with_state(repo)
}

/// Build the `/posts` routes for `repo`.
pub fn posts_router<R>(repo: Arc<R>) -> Router<()>
where
  R: PostRepository + 'static,
{
  Router::new()
    .route("/posts", get(posts::list::<R>).post(posts::create::<R>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<R>)
        .put(posts::update::<R>)
        .patch(posts::patch::<R>)
        .delete(posts::delete::<R>),
    )
    .route("/posts/user/{user_id}", get(posts::list_by_user::<R>))
    .route("/posts/{id}/restore", post(posts::restore::<R>))
    .with_state(repo)
}

/// Build the full API router.
///
/// Each repository is its own router state, so the returned `Router<()>` can
/// be merged into any parent router regardless of its own state type.
pub fn api_router<U, P>(users: Arc<U>, posts: Arc<P>) -> Router<()>
where
  U: UserRepository + 'static,
  P: PostRepository + 'static,
{
  Router::new()
    .merge(users_router(users))
    .merge(posts_router(posts))
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
  };
  use pressroom_core::{post::Post, user::User};
  use pressroom_store_sqlite::{SqlitePostRepository, SqliteStore, SqliteUserRepository};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(
      Arc::new(SqliteUserRepository::new(store.clone())),
      Arc::new(SqlitePostRepository::new(store)),
    )
  }

  async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
  }

  fn ann() -> Value { json!({ "firstname": "Ann", "lastname": "Lee", "email": "ann@x.com" }) }

  #[tokio::test]
  async fn create_user_returns_201() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/users", Some(ann())).await;
    assert_eq!(status, StatusCode::CREATED);
    let user: User = serde_json::from_value(body).unwrap();
    assert_eq!(user.first_name, "Ann");
    assert_eq!(user.deleted_at, None);
  }

  #[tokio::test]
  async fn list_users_empty_is_empty_array() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn invalid_payload_is_422() {
    let app = app().await;
    let bad = json!({ "firstname": "Ann", "lastname": "Lee", "email": "nope" });
    let (status, body) = send(&app, Method::POST, "/users", Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));
    assert_eq!(body["kind"], "validation_failed");
  }

  #[tokio::test]
  async fn duplicate_email_is_409() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(ann())).await;
    let (status, _) = send(&app, Method::POST, "/users", Some(ann())).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn unknown_user_is_404_and_bad_id_is_400() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/users/41", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, _) = send(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn patch_rejects_unknown_field() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/users", Some(ann())).await;
    let id = body["id"].as_i64().unwrap();

    let (status, _) = send(
      &app,
      Method::PATCH,
      &format!("/users/{id}"),
      Some(json!({ "nickname": "annie" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
      &app,
      Method::PATCH,
      &format!("/users/{id}"),
      Some(json!({ "lastname": "Park" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastname"], "Park");
    assert_eq!(body["firstname"], "Ann");
  }

  #[tokio::test]
  async fn put_replaces_user() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/users", Some(ann())).await;
    let id = body["id"].as_i64().unwrap();

    let replacement = json!({ "firstname": "Bo", "lastname": "Kim", "email": "bo@x.com" });
    let (status, body) = send(&app, Method::PUT, &format!("/users/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bo@x.com");
  }

  #[tokio::test]
  async fn delete_and_restore_user() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/users", Some(ann())).await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User deleted" }));

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::POST, &format!("/users/{id}/restore"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User restored" }));

    let (status, _) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn posts_by_user_include_owner() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/users", Some(ann())).await;
    let user_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
      &app,
      Method::POST,
      "/posts",
      Some(json!({ "content": "hi", "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post: Post = serde_json::from_value(body).unwrap();
    assert_eq!(post.user_id, Some(user_id));
    assert!(post.user.is_none());

    let (status, body) = send(&app, Method::GET, &format!("/posts/user/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let posts: Vec<Post> = serde_json::from_value(body).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, post.id);
    assert_eq!(posts[0].user.as_ref().map(|u| u.id), Some(user_id));
  }

  #[tokio::test]
  async fn post_patch_and_restore() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/posts", Some(json!({ "title": "t", "content": "hi" }))).await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["user_id"], Value::Null);

    let (status, body) = send(
      &app,
      Method::PATCH,
      &format!("/posts/{id}"),
      Some(json!({ "content": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "edited");
    assert_eq!(body["title"], "t");

    let (status, _) = send(&app, Method::PATCH, &format!("/posts/{id}"), Some(json!({ "views": 3 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    send(&app, Method::DELETE, &format!("/posts/{id}"), None).await;
    let (status, body) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::POST, &format!("/posts/{id}/restore"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/posts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
  }
}
