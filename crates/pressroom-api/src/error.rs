//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pressroom_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Repository(#[from] pressroom_core::Error),
}

impl ApiError {
  /// Convert any backend error into the shared taxonomy.
  pub fn repository<E: Into<pressroom_core::Error>>(e: E) -> Self {
    Self::Repository(e.into())
  }

  pub fn kind(&self) -> ErrorKind {
    let Self::Repository(e) = self;
    e.kind()
  }

  pub fn status(&self) -> StatusCode {
    match self.kind() {
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Conflict => StatusCode::CONFLICT,
      ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
      ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
      ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "repository call failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_map_to_distinct_statuses() {
    let cases = [
      (pressroom_core::Error::UserNotFound(1), StatusCode::NOT_FOUND),
      (pressroom_core::Error::Conflict("email".into()), StatusCode::CONFLICT),
      (
        pressroom_core::Error::ValidationFailed("x".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
      ),
      (
        pressroom_core::Error::StorageUnavailable(Box::new(std::io::Error::other("down"))),
        StatusCode::SERVICE_UNAVAILABLE,
      ),
      (pressroom_core::Error::Timeout, StatusCode::GATEWAY_TIMEOUT),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }

  #[tokio::test]
  async fn body_carries_message_and_kind() {
    let res = ApiError::from(pressroom_core::Error::Conflict("email taken".into())).into_response();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "conflict");
    assert_eq!(body["error"], "conflict: email taken");
  }
}
