//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::FaqAppState;
pub use middleware::{ClientAddress, require_admin_session};
pub use router::faq_router;
