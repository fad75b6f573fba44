//! SQLite connection factory.
//!
//! Each repository call opens its own `SyncConnectionWrapper` connection and
//! drops it when done; there is no pooling.

use std::path::Path;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};

use super::util::to_diesel_error;

/// Diesel error type alias.
pub type DieselError = diesel::result::Error;

/// Async SQLite connection type.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

/// Connection factory for a single SQLite database.
#[derive(Clone, Debug)]
pub struct DbPool {
    database_url: String,
}

impl DbPool {
    /// Create a pool from a database URL or file path.
    ///
    /// Accepts `sqlite://path`, `sqlite:path`, or a bare path.
    pub fn new(database_url: &str) -> Self {
        let url = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        Self {
            database_url: url.to_string(),
        }
    }

    /// Connection factory for a database file.
    pub fn from_path(path: &Path) -> Self {
        Self::new(&path.display().to_string())
    }

    /// Open a connection with foreign keys enforced.
    pub async fn get(&self) -> Result<SqliteConn, DieselError> {
        let mut conn = SqliteConn::establish(&self.database_url)
            .await
            .map_err(to_diesel_error)?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .await?;
        Ok(conn)
    }

    /// The database path, with any `sqlite:` prefix removed.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prefixes() {
        assert_eq!(DbPool::new("/data/prices.db").database_url(), "/data/prices.db");
        assert_eq!(DbPool::new("sqlite:prices.db").database_url(), "prices.db");
        assert_eq!(
            DbPool::new("sqlite:///data/prices.db").database_url(),
            "/data/prices.db"
        );
    }
}
