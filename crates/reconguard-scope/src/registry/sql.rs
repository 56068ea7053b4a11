use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reconguard_core::{normalize_target, AuthorizedTarget, GuardError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::TargetRegistry;

const CREATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS scope_targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL UNIQUE COLLATE NOCASE,
    added_at TEXT NOT NULL
)
";

/// SQLite-backed registry.
///
/// The unique constraint on `identifier` makes `add` an atomic
/// check-and-insert across processes sharing the database file.
#[derive(Debug, Clone)]
pub struct SqlRegistry {
    pool: SqlitePool,
}

impl SqlRegistry {
    /// Connect to a database and make sure the table exists.
    ///
    /// Accepts any `sqlite:` URL; the file is created if missing.
    /// In-memory databases (`sqlite::memory:` or `mode=memory`) keep a single
    /// connection so every query sees the same data.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| GuardError::Config(format!("invalid database url: {e}")))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(8)
                .acquire_timeout(Duration::from_secs(3))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| GuardError::Registry(format!("failed to connect to database: {e}")))?;

        let registry = Self::from_pool(pool).await?;
        info!(url = %database_url, "scope registry connected");
        Ok(registry)
    }

    /// Wrap an existing pool and make sure the table exists
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| GuardError::Registry(format!("failed to create table: {e}")))?;
        Ok(Self { pool })
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(database_url: &str) -> bool {
    if database_url.contains(":memory:") {
        return true;
    }
    database_url
        .split_once('?')
        .is_some_and(|(_, params)| params.split('&').any(|p| p == "mode=memory"))
}

#[async_trait]
impl TargetRegistry for SqlRegistry {
    async fn contains(&self, identifier: &str) -> Result<bool> {
        let Some(key) = normalize_target(identifier) else {
            return Ok(false);
        };

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM scope_targets WHERE identifier = ?")
                .bind(&key)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| GuardError::Registry(format!("failed to query target: {e}")))?;

        Ok(count > 0)
    }

    async fn add(&self, identifier: &str) -> Result<AuthorizedTarget> {
        let target = AuthorizedTarget::new(identifier).ok_or(GuardError::MissingTarget)?;

        let result = sqlx::query("INSERT INTO scope_targets (identifier, added_at) VALUES (?, ?)")
            .bind(&target.identifier)
            .bind(target.added_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(target),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(GuardError::DuplicateTarget(target.identifier))
            }
            Err(e) => Err(GuardError::Registry(format!("failed to insert target: {e}"))),
        }
    }

    async fn remove(&self, identifier: &str) -> Result<bool> {
        let Some(key) = normalize_target(identifier) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM scope_targets WHERE identifier = ?")
            .bind(&key)
            .execute(&self.pool)
            .await
            .map_err(|e| GuardError::Registry(format!("failed to delete target: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<AuthorizedTarget>> {
        let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT identifier, added_at FROM scope_targets ORDER BY identifier",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GuardError::Registry(format!("failed to list targets: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(identifier, added_at)| AuthorizedTarget {
                identifier,
                added_at,
            })
            .collect())
    }

    async fn len(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM scope_targets")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GuardError::Registry(format!("failed to count targets: {e}")))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn memory_registry() -> SqlRegistry {
        SqlRegistry::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_contains() {
        let registry = memory_registry().await;
        let target = registry.add("  Example.com ").await.unwrap();
        assert_eq!(target.identifier, "example.com");

        assert!(registry.contains("example.com").await.unwrap());
        assert!(registry.contains("EXAMPLE.COM").await.unwrap());
        assert!(!registry.contains("").await.unwrap());
        assert!(!registry.contains("other.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_constraint_rejects_duplicates() {
        let registry = memory_registry().await;
        registry.add("scanme.nmap.org").await.unwrap();

        let err = registry.add("SCANME.nmap.org").await.unwrap_err();
        assert!(matches!(err, GuardError::DuplicateTarget(_)));
        assert_eq!(registry.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_insert_once() {
        let registry = Arc::new(memory_registry().await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.add("10.0.0.5").await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn test_list_round_trips_timestamps() {
        let registry = memory_registry().await;
        let added = registry.add("b.example").await.unwrap();
        registry.add("a.example").await.unwrap();

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].identifier, "a.example");
        assert_eq!(listed[1].identifier, "b.example");
        assert_eq!(listed[1].added_at.timestamp(), added.added_at.timestamp());

        assert!(registry.remove("A.EXAMPLE").await.unwrap());
        assert_eq!(registry.len().await.unwrap(), 1);
    }

    #[test]
    fn test_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:scope?mode=memory"));
        assert!(is_in_memory("sqlite:file:scope?cache=shared&mode=memory"));
        assert!(!is_in_memory("sqlite:scope.db"));
        assert!(!is_in_memory("sqlite://scope.db?mode=rwc"));
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("scope.db").display());

        {
            let registry = SqlRegistry::connect(&url).await.unwrap();
            registry.add("lab.internal").await.unwrap();
            registry.pool().close().await;
        }

        let reopened = SqlRegistry::connect(&url).await.unwrap();
        assert!(reopened.contains("LAB.internal").await.unwrap());
    }
}
