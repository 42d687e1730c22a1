//! Application Layer
//!
//! Use cases and application services.

pub mod access_control;
pub mod config;
pub mod faq_page;
pub mod moderation;
pub mod submit_question;

// Re-exports
pub use access_control::AccessControl;
pub use config::{AccessConfig, BackendKind, ConfigError, FaqSettings, SheetConfig};
pub use faq_page::{FaqPageOutput, FaqPageUseCase};
pub use moderation::ModerationUseCase;
pub use submit_question::{SubmitQuestionInput, SubmitQuestionUseCase};
