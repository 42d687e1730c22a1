//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every crate of the FAQ backend:
//! - Error classification and the unified [`error::app_error::AppError`]
//! - Typed, time-ordered identifiers
//!
//! Only things with a stable meaning across crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
