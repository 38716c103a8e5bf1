//! [`SqliteStore`]: the storage client shared by every repository.

use std::{path::Path, time::Duration};

use crate::{Error, Result, schema::SCHEMA};

/// Upper bound on how long a single repository operation may wait for the
/// connection thread.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long SQLite itself retries when the database file is locked.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A connection to a single SQLite database.
///
/// Cloning is cheap (the inner connection is reference-counted), so one
/// store is opened at startup and a clone is passed to each repository.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn, timeout: DEFAULT_TIMEOUT };
    store
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(store)
  }

  /// Bound every subsequent operation on this handle by `timeout`.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn timeout(&self) -> Duration { self.timeout }

  /// Close the underlying connection. Other clones of this store fail with a
  /// storage error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Run `function` on the connection thread, giving up after the configured
  /// timeout. The closure itself is not cancelled; only the wait is.
  pub(crate) async fn call<F, R>(&self, function: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    match tokio::time::timeout(self.timeout, self.conn.call(function)).await {
      Ok(result) => Ok(result?),
      Err(_) => Err(Error::Timeout(self.timeout)),
    }
  }
}
