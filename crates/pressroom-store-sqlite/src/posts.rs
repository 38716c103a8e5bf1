//! [`SqlitePostRepository`]: the SQLite implementation of [`PostRepository`].
//!
//! An owner id is resolved against active users at write time: an id that
//! does not name an active user is stored as `NULL`, so a post never points
//! at a missing or soft-deleted owner.

use chrono::Utc;
use pressroom_core::{
  patch::PostPatch,
  post::{NewPost, Post, PostId},
  repository::PostRepository,
  user::UserId,
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result, SqliteStore,
  encode::{POST_COLUMNS, RawPost, encode_dt},
};

/// Scalar subquery yielding `?n` if it names an active user, else `NULL`.
macro_rules! active_owner {
  ($n:literal) => {
    concat!("(SELECT id FROM users WHERE id = ?", $n, " AND deleted_at IS NULL)")
  };
}

// ─── Queries ─────────────────────────────────────────────────────────────────

fn select_active(conn: &Connection, id: PostId) -> rusqlite::Result<Option<RawPost>> {
  conn
    .query_row(
      &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1 AND deleted_at IS NULL"),
      params![id],
      RawPost::from_row,
    )
    .optional()
}

fn exists(conn: &Connection, id: PostId) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM posts WHERE id = ?1", params![id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

fn write_fields(
  conn: &Connection,
  id: PostId,
  fields: &NewPost,
  now: &str,
) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    concat!(
      "UPDATE posts SET title = ?2, content = ?3, user_id = ",
      active_owner!(4),
      ", updated_at = ?5 WHERE id = ?1 AND deleted_at IS NULL"
    ),
    params![id, fields.title, fields.content, fields.user_id, now],
  )?;
  Ok(changed > 0)
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Posts backed by a [`SqliteStore`].
#[derive(Clone)]
pub struct SqlitePostRepository {
  store: SqliteStore,
}

impl SqlitePostRepository {
  pub fn new(store: SqliteStore) -> Self { Self { store } }
}

impl PostRepository for SqlitePostRepository {
  type Error = Error;

  async fn find_all(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .store
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts WHERE deleted_at IS NULL ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn find_by_id(&self, id: PostId) -> Result<Post> {
    let raw = self
      .store
      .call(move |conn| Ok(select_active(conn, id)?))
      .await?;

    raw.ok_or(Error::PostNotFound(id))?.into_post()
  }

  async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .store
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             p.id, p.title, p.content, p.user_id,
             p.created_at, p.updated_at, p.deleted_at,
             u.id, u.first_name, u.last_name, u.email,
             u.created_at, u.updated_at, u.deleted_at
           FROM posts p
           JOIN users u ON u.id = p.user_id
           WHERE p.user_id = ?1
             AND p.deleted_at IS NULL
             AND u.deleted_at IS NULL
           ORDER BY p.id",
        )?;
        let rows = stmt
          .query_map(params![user_id], RawPost::from_joined_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn create(&self, input: NewPost) -> Result<Post> {
    let now = encode_dt(Utc::now());

    let raw = self
      .store
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          concat!(
            "INSERT INTO posts (title, content, user_id, created_at, updated_at) VALUES (?1, ?2, ",
            active_owner!(3),
            ", ?4, ?4)"
          ),
          params![input.title, input.content, input.user_id, now],
        )?;
        let id = tx.last_insert_rowid();
        let raw = tx.query_row(
          &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
          params![id],
          RawPost::from_row,
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_post()
  }

  async fn update(&self, id: PostId, input: NewPost) -> Result<Post> {
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
      .await?;

    raw.ok_or(Error::PostNotFound(id))?.into_post()
  }

  async fn partial_update(&self, id: PostId, patch: PostPatch) -> Result<Post> {
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

        let mut fields = NewPost {
          title:   existing.title,
          content: existing.content,
          user_id: existing.user_id,
        };
        patch.apply(&mut fields);
        write_fields(&tx, id, &fields, &now)?;

        // Re-read so the caller sees exactly what was persisted.
        let raw = select_active(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.ok_or(Error::PostNotFound(id))?.into_post()
  }

  async fn delete(&self, id: PostId) -> Result<()> {
    let now = encode_dt(Utc::now());

    let found = self
      .store
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE posts SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
          params![id, now],
        )?;
        Ok(changed > 0 || exists(conn, id)?)
      })
      .await?;

    if found { Ok(()) } else { Err(Error::PostNotFound(id)) }
  }

  async fn restore(&self, id: PostId) -> Result<()> {
    let found = self
      .store
      .call(move |conn| {
        conn.execute(
          "UPDATE posts SET deleted_at = NULL WHERE id = ?1 AND deleted_at IS NOT NULL",
          params![id],
        )?;
        Ok(exists(conn, id)?)
      })
      .await?;

    if found { Ok(()) } else { Err(Error::PostNotFound(id)) }
  }
}
