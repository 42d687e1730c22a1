//! Backend selection
//!
//! The configured storage backend, chosen once at startup.

use platform::http::HttpTransport;

use crate::domain::entities::QaRecord;
use crate::domain::repository::QaRepository;
use crate::error::FaqResult;
use crate::infra::sheets::SheetQaStore;
use crate::infra::sqlite::SqliteQaStore;

pub enum QaStore<T> {
    Relational(SqliteQaStore),
    Spreadsheet(SheetQaStore<T>),
}

impl<T> QaStore<T> {
    pub fn backend_name(&self) -> &'static str {
        match self {
            QaStore::Relational(_) => "sqlite",
            QaStore::Spreadsheet(_) => "sheets",
        }
    }
}

impl<T> From<SqliteQaStore> for QaStore<T> {
    fn from(store: SqliteQaStore) -> Self {
        QaStore::Relational(store)
    }
}

impl<T> From<SheetQaStore<T>> for QaStore<T> {
    fn from(store: SheetQaStore<T>) -> Self {
        QaStore::Spreadsheet(store)
    }
}

impl<T: HttpTransport + Send + Sync> QaRepository for QaStore<T> {
    async fn create_entry(&self, question: &str, order_hint: u32) -> FaqResult<()> {
        match self {
            QaStore::Relational(s) => s.create_entry(question, order_hint).await,
            QaStore::Spreadsheet(s) => s.create_entry(question, order_hint).await,
        }
    }

    async fn update_entry(&self, id: i64, answer: &str, validated: bool) -> FaqResult<()> {
        match self {
            QaStore::Relational(s) => s.update_entry(id, answer, validated).await,
            QaStore::Spreadsheet(s) => s.update_entry(id, answer, validated).await,
        }
    }

    async fn delete_entry(&self, id: i64) -> FaqResult<()> {
        match self {
            QaStore::Relational(s) => s.delete_entry(id).await,
            QaStore::Spreadsheet(s) => s.delete_entry(id).await,
        }
    }

    async fn list_validated(&self) -> FaqResult<Vec<QaRecord>> {
        match self {
            QaStore::Relational(s) => s.list_validated().await,
            QaStore::Spreadsheet(s) => s.list_validated().await,
        }
    }

    async fn list_all(&self) -> FaqResult<Vec<QaRecord>> {
        match self {
            QaStore::Relational(s) => s.list_all().await,
            QaStore::Spreadsheet(s) => s.list_all().await,
        }
    }
}
