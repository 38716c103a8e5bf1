//! SQL schema for the Pressroom SQLite store.
//!
//! Executed once at connection startup. Soft deletes are plain updates of
//! `deleted_at`; every read applies `deleted_at IS NULL` explicitly.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name   TEXT NOT NULL CHECK (length(trim(last_name)) > 0),
    email       TEXT NOT NULL CHECK (instr(email, '@') > 1),
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT             -- NULL while active
);

-- Email is unique among active users only; a soft-deleted row releases it.
CREATE UNIQUE INDEX IF NOT EXISTS users_active_email_idx
    ON users(email) WHERE deleted_at IS NULL;

CREATE TABLE IF NOT EXISTS posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL DEFAULT '',
    content     TEXT NOT NULL DEFAULT '',
    user_id     INTEGER REFERENCES users(id)
                    ON UPDATE CASCADE ON DELETE SET NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT
);

CREATE INDEX IF NOT EXISTS posts_user_idx ON posts(user_id);

-- Soft-deleting a user releases its posts, mirroring ON DELETE SET NULL.
CREATE TRIGGER IF NOT EXISTS users_soft_delete_releases_posts
AFTER UPDATE OF deleted_at ON users
WHEN OLD.deleted_at IS NULL AND NEW.deleted_at IS NOT NULL
BEGIN
    UPDATE posts SET user_id = NULL WHERE user_id = NEW.id;
END;

PRAGMA user_version = 1;
";
