//! Typed partial updates.
//!
//! A patch is built from a dynamic `field name -> JSON value` mapping and
//! holds `Some` only for the fields the caller supplied. Unknown field names
//! and values of the wrong type are rejected, never silently dropped.
//!
//! Merging a patch into an existing row overwrites exactly the supplied
//! fields; everything else is left as it was.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  post::NewPost,
  user::{NewUser, UserId},
  validate::{require_email, require_non_empty},
};

/// The dynamic form a partial update arrives in.
pub type FieldMap = Map<String, Value>;

// ─── Field extraction ───────────────────────────────────────────────────────

fn string_field(field: &str, value: Value) -> Result<String> {
  match value {
    Value::String(s) => Ok(s),
    other => Err(Error::invalid(format!(
      "field {field:?} must be a string, got {}",
      type_name(&other)
    ))),
  }
}

fn optional_id_field(field: &str, value: Value) -> Result<Option<UserId>> {
  match value {
    Value::Null => Ok(None),
    Value::Number(n) => match n.as_i64() {
      Some(id) if id >= 0 => Ok(Some(id)),
      _ => Err(Error::invalid(format!(
        "field {field:?} must be a non-negative integer, got {n}"
      ))),
    },
    other => Err(Error::invalid(format!(
      "field {field:?} must be an integer or null, got {}",
      type_name(&other)
    ))),
  }
}

fn unknown_field(entity: &str, field: &str) -> Error {
  Error::invalid(format!("unknown {entity} field: {field:?}"))
}

fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

// ─── UserPatch ──────────────────────────────────────────────────────────────

/// A partial update of a user. Field names follow the wire format:
/// `firstname`, `lastname`, `email`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
}

impl UserPatch {
  pub fn from_fields(fields: FieldMap) -> Result<Self> {
    let mut patch = Self::default();
    for (key, value) in fields {
      match key.as_str() {
        "firstname" => patch.first_name = Some(string_field(&key, value)?),
        "lastname" => patch.last_name = Some(string_field(&key, value)?),
        "email" => patch.email = Some(string_field(&key, value)?),
        _ => return Err(unknown_field("user", &key)),
      }
    }
    Ok(patch)
  }

  pub fn is_empty(&self) -> bool {
    self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
  }

  /// Check each supplied value on its own; absent fields are not inspected.
  pub fn validate(&self) -> Result<()> {
    if let Some(v) = &self.first_name {
      require_non_empty("firstname", v)?;
    }
    if let Some(v) = &self.last_name {
      require_non_empty("lastname", v)?;
    }
    if let Some(v) = &self.email {
      require_email("email", v)?;
    }
    Ok(())
  }

  pub fn apply(&self, target: &mut NewUser) {
    if let Some(v) = &self.first_name {
      target.first_name.clone_from(v);
    }
    if let Some(v) = &self.last_name {
      target.last_name.clone_from(v);
    }
    if let Some(v) = &self.email {
      target.email.clone_from(v);
    }
  }
}

// ─── PostPatch ──────────────────────────────────────────────────────────────

/// A partial update of a post.
///
/// `user_id` is doubly optional: `Some(None)` clears the owner, `None` leaves
/// it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
  pub title:   Option<String>,
  pub content: Option<String>,
  pub user_id: Option<Option<UserId>>,
}

impl PostPatch {
  pub fn from_fields(fields: FieldMap) -> Result<Self> {
    let mut patch = Self::default();
    for (key, value) in fields {
      match key.as_str() {
        "title" => patch.title = Some(string_field(&key, value)?),
        "content" => patch.content = Some(string_field(&key, value)?),
        "user_id" => patch.user_id = Some(optional_id_field(&key, value)?),
        _ => return Err(unknown_field("post", &key)),
      }
    }
    Ok(patch)
  }

  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.content.is_none() && self.user_id.is_none()
  }

  pub fn apply(&self, target: &mut NewPost) {
    if let Some(v) = &self.title {
      target.title.clone_from(v);
    }
    if let Some(v) = &self.content {
      target.content.clone_from(v);
    }
    if let Some(v) = self.user_id {
      target.user_id = v;
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn fields(v: Value) -> FieldMap {
    match v {
      Value::Object(m) => m,
      _ => panic!("expected an object"),
    }
  }

  #[test]
  fn user_patch_overwrites_only_supplied_fields() {
    let patch = UserPatch::from_fields(fields(json!({ "lastname": "Park" }))).unwrap();
    let mut user = NewUser::new("Ann", "Lee", "ann@x.com");
    patch.apply(&mut user);
    assert_eq!(user, NewUser::new("Ann", "Park", "ann@x.com"));
  }

  #[test]
  fn user_patch_rejects_unknown_fields() {
    let err = UserPatch::from_fields(fields(json!({ "nickname": "annie" }))).unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(ref m) if m.contains("nickname")));
  }

  #[test]
  fn user_patch_rejects_wrong_types() {
    let err = UserPatch::from_fields(fields(json!({ "email": 42 }))).unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(ref m) if m.contains("string")));
  }

  #[test]
  fn user_patch_validates_supplied_values() {
    let patch = UserPatch::from_fields(fields(json!({ "email": "nope" }))).unwrap();
    assert!(patch.validate().is_err());

    let patch = UserPatch::from_fields(fields(json!({ "firstname": "" }))).unwrap();
    assert!(patch.validate().is_err());
  }

  #[test]
  fn empty_mapping_is_an_empty_patch() {
    assert!(UserPatch::from_fields(FieldMap::new()).unwrap().is_empty());
    assert!(PostPatch::from_fields(FieldMap::new()).unwrap().is_empty());
  }

  #[test]
  fn post_patch_null_owner_clears_it() {
    let patch = PostPatch::from_fields(fields(json!({ "user_id": null }))).unwrap();
    assert_eq!(patch.user_id, Some(None));

    let mut post = NewPost::new("hi", Some(1));
    patch.apply(&mut post);
    assert_eq!(post.user_id, None);
    assert_eq!(post.content, "hi");
  }

  #[test]
  fn post_patch_absent_owner_is_untouched() {
    let patch = PostPatch::from_fields(fields(json!({ "content": "edited" }))).unwrap();
    let mut post = NewPost::new("hi", Some(1)).with_title("greeting");
    patch.apply(&mut post);
    assert_eq!(post.user_id, Some(1));
    assert_eq!(post.title, "greeting");
    assert_eq!(post.content, "edited");
  }

  #[test]
  fn post_patch_rejects_bad_owner_ids() {
    for bad in [json!({ "user_id": -1 }), json!({ "user_id": "1" }), json!({ "user_id": 1.5 })] {
      assert!(PostPatch::from_fields(fields(bad)).is_err());
    }
  }

  #[test]
  fn post_patch_rejects_unknown_fields() {
    let err = PostPatch::from_fields(fields(json!({ "id": 3 }))).unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
  }
}
