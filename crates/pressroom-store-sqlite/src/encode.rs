//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use pressroom_core::{post::Post, user::User};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "id, first_name, last_name, email, created_at, updated_at, deleted_at";

pub const POST_COLUMNS: &str =
  "id, title, content, user_id, created_at, updated_at, deleted_at";

/// Number of columns in [`USER_COLUMNS`] and [`POST_COLUMNS`].
pub const ROW_WIDTH: usize = 7;

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
#[derive(Debug)]
pub struct RawUser {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub created_at: String,
  pub updated_at: String,
  pub deleted_at: Option<String>,
}

impl RawUser {
  /// Read the [`USER_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(at)?,
      first_name: row.get(at + 1)?,
      last_name:  row.get(at + 2)?,
      email:      row.get(at + 3)?,
      created_at: row.get(at + 4)?,
      updated_at: row.get(at + 5)?,
      deleted_at: row.get(at + 6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         self.id,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      deleted_at: decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw values read directly from a `posts` row, optionally joined with its
/// owner.
#[derive(Debug)]
pub struct RawPost {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub user_id:    Option<i64>,
  pub created_at: String,
  pub updated_at: String,
  pub deleted_at: Option<String>,
  pub owner:      Option<RawUser>,
}

impl RawPost {
  /// Read the [`POST_COLUMNS`] starting at column 0.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      user_id:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
      deleted_at: row.get(6)?,
      owner:      None,
    })
  }

  /// Read [`POST_COLUMNS`] followed by the owner's [`USER_COLUMNS`].
  pub fn from_joined_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut raw = Self::from_row(row)?;
    raw.owner = Some(RawUser::from_row(row, ROW_WIDTH)?);
    Ok(raw)
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:         self.id,
      title:      self.title,
      content:    self.content,
      user_id:    self.user_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      deleted_at: decode_opt_dt(self.deleted_at.as_deref())?,
      user:       self.owner.map(RawUser::into_user).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_roundtrip_exactly() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn garbage_timestamp_is_a_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
