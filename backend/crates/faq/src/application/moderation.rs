//! Moderation Use Case
//!
//! Admin-only operations. Session checks happen in the HTTP layer.

use std::sync::Arc;

use crate::domain::entities::QaRecord;
use crate::domain::repository::QaRepository;
use crate::error::FaqResult;

pub struct ModerationUseCase<R>
where
    R: QaRepository,
{
    repo: Arc<R>,
}

impl<R> ModerationUseCase<R>
where
    R: QaRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> FaqResult<Vec<QaRecord>> {
        self.repo.list_all().await
    }

    /// Set the answer and publication flag of an entry
    pub async fn answer(&self, id: i64, answer: &str, validated: bool) -> FaqResult<()> {
        self.repo.update_entry(id, answer, validated).await?;
        tracing::info!(entry_id = id, validated, "FAQ entry moderated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> FaqResult<()> {
        self.repo.delete_entry(id).await?;
        tracing::info!(entry_id = id, "FAQ entry deleted");
        Ok(())
    }
}
