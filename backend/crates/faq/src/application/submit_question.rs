//! Submit Question Use Case
//!
//! Visitor question flow: cooldown, captcha, length, store, cooldown start.

use std::sync::Arc;

use platform::http::HttpTransport;

use crate::application::access_control::AccessControl;
use crate::domain::repository::QaRepository;
use crate::domain::value_objects::{AddressFingerprint, Question};
use crate::error::{FaqError, FaqResult};

/// Submit question input
#[derive(Debug, Clone)]
pub struct SubmitQuestionInput {
    pub question: String,
    pub captcha_response: String,
    /// Number of entries the visitor saw on the page
    pub order_hint: u32,
}

pub struct SubmitQuestionUseCase<R, T>
where
    R: QaRepository,
    T: HttpTransport,
{
    repo: Arc<R>,
    access: Arc<AccessControl<T>>,
}

impl<R, T> SubmitQuestionUseCase<R, T>
where
    R: QaRepository + Send + Sync,
    T: HttpTransport + Send + Sync,
{
    pub fn new(repo: Arc<R>, access: Arc<AccessControl<T>>) -> Self {
        Self { repo, access }
    }

    /// Run the submission. The cooldown only starts once the entry is stored.
    pub async fn execute(&self, input: SubmitQuestionInput, raw_address: &str) -> FaqResult<()> {
        if !self.access.can_submit(raw_address) {
            return Err(FaqError::RateLimited);
        }

        if !self.access.verify_captcha(&input.captcha_response).await {
            return Err(FaqError::VerificationFailed);
        }

        let question = Question::parse(input.question)?;

        self.repo
            .create_entry(question.as_str(), input.order_hint.saturating_add(1))
            .await?;

        self.access.register_submission(raw_address);

        tracing::info!(
            fingerprint = %AddressFingerprint::of(raw_address),
            "Visitor question stored"
        );
        Ok(())
    }
}
