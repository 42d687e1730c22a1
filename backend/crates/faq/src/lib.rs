//! FAQ Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository trait
//! - `application/` - Access control and use cases
//! - `infra/` - SQLite and spreadsheet storage backends
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Security Model
//! - Admin sessions are opaque time-ordered tokens held in memory for 30 minutes
//! - Submission cooldowns are keyed by a SHA-256 fingerprint of the caller address
//! - Captcha and token exchanges fail closed

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AccessConfig, FaqSettings, SheetConfig};
pub use application::AccessControl;
pub use error::{FaqError, FaqResult};
pub use infra::{QaStore, SheetQaStore, SqliteQaStore};
pub use presentation::router::faq_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
