//! User: the account that owns zero or more posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  validate::{require_email, require_non_empty},
};

/// Storage-assigned user identifier.
pub type UserId = i64;

/// A persisted user.
///
/// `deleted_at` is the soft-delete marker: `None` while the user is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         UserId,
  #[serde(rename = "firstname")]
  pub first_name: String,
  #[serde(rename = "lastname")]
  pub last_name:  String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
  pub fn is_active(&self) -> bool { self.deleted_at.is_none() }

  /// The mutable fields of this user, as accepted by create and update.
  pub fn fields(&self) -> NewUser {
    NewUser {
      first_name: self.first_name.clone(),
      last_name:  self.last_name.clone(),
      email:      self.email.clone(),
    }
  }
}

/// Input to [`crate::repository::UserRepository::create`] and
/// [`crate::repository::UserRepository::update`].
///
/// Identifiers and timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  #[serde(rename = "firstname")]
  pub first_name: String,
  #[serde(rename = "lastname")]
  pub last_name:  String,
  pub email:      String,
}

impl NewUser {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name:  last_name.into(),
      email:      email.into(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    require_non_empty("firstname", &self.first_name)?;
    require_non_empty("lastname", &self.last_name)?;
    require_email("email", &self.email)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn valid_user_passes() {
    assert!(NewUser::new("Ann", "Lee", "ann@x.com").validate().is_ok());
  }

  #[test]
  fn missing_names_and_bad_email_fail() {
    for input in [
      NewUser::new("", "Lee", "ann@x.com"),
      NewUser::new("Ann", " ", "ann@x.com"),
      NewUser::new("Ann", "Lee", "not-an-email"),
    ] {
      assert!(matches!(input.validate(), Err(Error::ValidationFailed(_))));
    }
  }

  #[test]
  fn serialises_with_wire_field_names() {
    let json = serde_json::to_value(NewUser::new("Ann", "Lee", "ann@x.com")).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "firstname": "Ann", "lastname": "Lee", "email": "ann@x.com" })
    );
  }
}
