//! [`SqliteUserRepository`]: the SQLite implementation of [`UserRepository`].

use chrono::Utc;
use pressroom_core::{
  patch::UserPatch,
  repository::UserRepository,
  user::{NewUser, User, UserId},
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result, SqliteStore,
  encode::{RawUser, USER_COLUMNS, encode_dt},
};

// ─── Queries ─────────────────────────────────────────────────────────────────

fn select_active(conn: &Connection, id: UserId) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND deleted_at IS NULL"),
      params![id],
      |row| RawUser::from_row(row, 0),
    )
    .optional()
}

/// Whether a row exists at all, deleted or not.
fn exists(conn: &Connection, id: UserId) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

/// Overwrite the mutable fields of an active user. Returns `false` if no
/// active row matched.
fn write_fields(
  conn: &Connection,
  id: UserId,
  fields: &NewUser,
  now: &str,
) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE users
        SET first_name = ?2, last_name = ?3, email = ?4, updated_at = ?5
      WHERE id = ?1 AND deleted_at IS NULL",
    params![id, fields.first_name, fields.last_name, fields.email, now],
  )?;
  Ok(changed > 0)
}

/// Result of a restore attempt, decided inside the transaction.
enum Restore {
  Done,
  Missing,
  /// Another active user claimed the email while this one was deleted.
  EmailTaken(String),
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Users backed by a [`SqliteStore`].
#[derive(Clone)]
pub struct SqliteUserRepository {
  store: SqliteStore,
}

impl SqliteUserRepository {
  pub fn new(store: SqliteStore) -> Self { Self { store } }
}

impl UserRepository for SqliteUserRepository {
  type Error = Error;

  async fn find_all(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .store
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], |row| RawUser::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn find_by_id(&self, id: UserId) -> Result<User> {
    let raw = self
      .store
      .call(move |conn| Ok(select_active(conn, id)?))
      .await?;

    raw.ok_or(Error::UserNotFound(id))?.into_user()
  }

  async fn create(&self, input: NewUser) -> Result<User> {
    input.validate()?;

    let email = input.email.clone();
    let now = encode_dt(Utc::now());

    let raw = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (first_name, last_name, email, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          params![input.first_name, input.last_name, input.email, now],
        )?;
        let id = tx.last_insert_rowid();
        let raw = tx.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
          params![id],
          |row| RawUser::from_row(row, 0),
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(|e| e.on_unique_violation(|| Error::EmailTaken(email)))?;

    raw.into_user()
  }

  async fn update(&self, id: UserId, input: NewUser) -> Result<User> {
    input.validate()?;

    let email = input.email.clone();
    let now = encode_dt(Utc::now());

    let raw = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !write_fields(&tx, id, &input, &now)? {
          return Ok(None);
        }
        let raw = select_active(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(|e| e.on_unique_violation(|| Error::EmailTaken(email)))?;

    raw.ok_or(Error::UserNotFound(id))?.into_user()
  }

  async fn partial_update(&self, id: UserId, patch: UserPatch) -> Result<User> {
    patch.validate()?;

    let email = patch.email.clone().unwrap_or_default();
    let now = encode_dt(Utc::now());

    let raw = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(existing) = select_active(&tx, id)? else {
          return Ok(None);
        };
        if patch.is_empty() {
          return Ok(Some(existing));
        }

        let mut fields = NewUser {
          first_name: existing.first_name,
          last_name:  existing.last_name,
          email:      existing.email,
        };
        patch.apply(&mut fields);
        write_fields(&tx, id, &fields, &now)?;

        // Re-read so the caller sees exactly what was persisted.
        let raw = select_active(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(|e| e.on_unique_violation(|| Error::EmailTaken(email)))?;

    raw.ok_or(Error::UserNotFound(id))?.into_user()
  }

  async fn delete(&self, id: UserId) -> Result<()> {
    let now = encode_dt(Utc::now());

    let found = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Posts owned by this user are released by the
        // `users_soft_delete_releases_posts` trigger.
        let changed = tx.execute(
          "UPDATE users SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
          params![id, now],
        )?;
        let found = changed > 0 || exists(&tx, id)?;
        tx.commit()?;
        Ok(found)
      })
      .await?;

    if found { Ok(()) } else { Err(Error::UserNotFound(id)) }
  }

  async fn restore(&self, id: UserId) -> Result<()> {
    let outcome = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        let row: Option<(String, Option<String>)> = tx
          .query_row(
            "SELECT email, deleted_at FROM users WHERE id = ?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((email, deleted_at)) = row else {
          return Ok(Restore::Missing);
        };
        if deleted_at.is_none() {
          return Ok(Restore::Done);
        }

        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND deleted_at IS NULL",
            params![email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(Restore::EmailTaken(email));
        }

        tx.execute("UPDATE users SET deleted_at = NULL WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Restore::Done)
      })
      .await?;

    match outcome {
      Restore::Done => Ok(()),
      Restore::Missing => Err(Error::UserNotFound(id)),
      Restore::EmailTaken(email) => Err(Error::EmailTaken(email)),
    }
  }
}
