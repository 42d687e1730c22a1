//! SQLite Repository Implementation

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::clock::Clock;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::domain::entities::QaRecord;
use crate::domain::repository::QaRepository;
use crate::error::FaqResult;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS faq_entries (
        id          INTEGER PRIMARY KEY,
        question    TEXT NOT NULL,
        answer      TEXT,
        asked_at    TEXT NOT NULL,
        answered_at TEXT,
        validated   INTEGER NOT NULL DEFAULT 0
    )
"#;

/// SQLite-backed FAQ repository. Entry ids are assigned by SQLite.
#[derive(Clone)]
pub struct SqliteQaStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteQaStore {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Open (creating if needed) the database at `url`
    pub async fn connect(url: &str, clock: Arc<dyn Clock>) -> FaqResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool, clock))
    }

    /// Private in-memory database on a single pinned connection
    pub async fn in_memory(clock: Arc<dyn Clock>) -> FaqResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(pool, clock);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> FaqResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    async fn fetch(&self, validated_only: bool) -> FaqResult<Vec<QaRecord>> {
        let sql = if validated_only {
            r#"
            SELECT id, question, answer, asked_at, answered_at, validated
            FROM faq_entries
            WHERE validated = 1
            ORDER BY id
            "#
        } else {
            r#"
            SELECT id, question, answer, asked_at, answered_at, validated
            FROM faq_entries
            ORDER BY id
            "#
        };

        let rows = sqlx::query_as::<_, EntryRow>(sql)
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list FAQ entries"))?;

        Ok(rows.into_iter().map(EntryRow::into_record).collect())
    }
}

impl QaRepository for SqliteQaStore {
    /// Rows are ordered by id, so `_order_hint` is not stored
    async fn create_entry(&self, question: &str, _order_hint: u32) -> FaqResult<()> {
        sqlx::query(
            r#"
            INSERT INTO faq_entries (question, answer, asked_at, validated)
            VALUES (?, '', ?, 0)
            "#,
        )
        .bind(question)
        .bind(self.now())
        .execute(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to insert FAQ entry"))?;

        Ok(())
    }

    async fn update_entry(&self, id: i64, answer: &str, validated: bool) -> FaqResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE faq_entries
            SET answer = ?, validated = ?, answered_at = ?
            WHERE id = ?
            "#,
        )
        .bind(answer)
        .bind(validated)
        .bind(self.now())
        .bind(id)
        .execute(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, entry_id = id, "Failed to update FAQ entry"))?
        .rows_affected();

        if affected == 0 {
            tracing::debug!(entry_id = id, "Update matched no FAQ entry");
        }
        Ok(())
    }

    async fn delete_entry(&self, id: i64) -> FaqResult<()> {
        sqlx::query("DELETE FROM faq_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .inspect_err(
                |e| tracing::error!(error = %e, entry_id = id, "Failed to delete FAQ entry"),
            )?;

        Ok(())
    }

    async fn list_validated(&self) -> FaqResult<Vec<QaRecord>> {
        self.fetch(true).await
    }

    async fn list_all(&self) -> FaqResult<Vec<QaRecord>> {
        self.fetch(false).await
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    question: String,
    answer: Option<String>,
    asked_at: Option<DateTime<Utc>>,
    answered_at: Option<DateTime<Utc>>,
    validated: bool,
}

impl EntryRow {
    fn into_record(self) -> QaRecord {
        QaRecord {
            id: self.id,
            question: self.question,
            answer: self.answer.unwrap_or_default(),
            asked_at: self.asked_at,
            answered_at: self.answered_at,
            validated: self.validated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;

    async fn store() -> SqliteQaStore {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        SqliteQaStore::in_memory(clock).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = store().await;
        store.create_entry("Comment s'inscrire ?", 7).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].question, "Comment s'inscrire ?");
        assert_eq!(all[0].answer, "");
        assert!(!all[0].validated);
        assert_eq!(
            all[0].asked_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
        assert!(store.list_validated().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_publishes_entry() {
        let store = store().await;
        store.create_entry("Q", 0).await.unwrap();
        store.update_entry(1, "A", true).await.unwrap();

        let validated = store.list_validated().await.unwrap();
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].answer, "A");
        assert!(validated[0].answered_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_errors() {
        let store = store().await;
        store.update_entry(42, "A", true).await.unwrap();
        store.delete_entry(42).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let store = store().await;
        store.create_entry("Q1", 0).await.unwrap();
        store.create_entry("Q2", 1).await.unwrap();
        store.delete_entry(1).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].question, "Q2");
    }

    #[tokio::test]
    async fn test_closed_pool_is_backend_unavailable() {
        let store = store().await;
        store.pool.close().await;
        assert!(matches!(
            store.list_all().await,
            Err(crate::error::FaqError::BackendUnavailable(_))
        ));
    }
}
