//! FAQ Page Use Case
//!
//! Everything the public page needs in one call.

use std::sync::Arc;

use platform::http::HttpTransport;

use crate::application::access_control::AccessControl;
use crate::domain::entities::QaRecord;
use crate::domain::repository::QaRepository;

/// Public page output
#[derive(Debug, Clone)]
pub struct FaqPageOutput {
    pub captcha_client: String,
    /// Whether the submission form should be shown to this visitor
    pub can_ask: bool,
    pub entries: Vec<QaRecord>,
}

pub struct FaqPageUseCase<R, T>
where
    R: QaRepository,
    T: HttpTransport,
{
    repo: Arc<R>,
    access: Arc<AccessControl<T>>,
}

impl<R, T> FaqPageUseCase<R, T>
where
    R: QaRepository + Send + Sync,
    T: HttpTransport + Send + Sync,
{
    pub fn new(repo: Arc<R>, access: Arc<AccessControl<T>>) -> Self {
        Self { repo, access }
    }

    /// A failed listing renders as an empty FAQ
    pub async fn execute(&self, raw_address: &str) -> FaqPageOutput {
        let entries = match self.repo.list_validated().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Validated entries unavailable, rendering empty FAQ");
                Vec::new()
            }
        };

        FaqPageOutput {
            captcha_client: self.access.captcha_client().to_string(),
            can_ask: self.access.can_show_submission_form(raw_address),
            entries,
        }
    }
}
