//! Repository Traits
//!
//! Storage capability contract. Implementations live in the infra layer.

use crate::domain::entities::QaRecord;
use crate::error::FaqResult;

/// Question/answer storage
///
/// Every transport or parse failure comes back as
/// `FaqError::BackendUnavailable`; an empty list means "zero rows".
#[trait_variant::make(QaRepository: Send)]
pub trait LocalQaRepository {
    /// Store a new unanswered question. `order_hint` is the position the
    /// visitor saw; backends that order by themselves ignore it.
    async fn create_entry(&self, question: &str, order_hint: u32) -> FaqResult<()>;

    /// Set the answer and validation flag of an entry
    async fn update_entry(&self, id: i64, answer: &str, validated: bool) -> FaqResult<()>;

    async fn delete_entry(&self, id: i64) -> FaqResult<()>;

    /// Entries visible to anonymous readers
    async fn list_validated(&self) -> FaqResult<Vec<QaRecord>>;

    async fn list_all(&self) -> FaqResult<Vec<QaRecord>>;
}
