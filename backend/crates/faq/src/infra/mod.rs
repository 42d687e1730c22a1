//! Infrastructure Layer
//!
//! Storage backends and the spreadsheet token exchange.

pub mod sheets;
pub mod sqlite;
pub mod store;
pub mod token_manager;

pub use sheets::SheetQaStore;
pub use sqlite::SqliteQaStore;
pub use store::QaStore;
pub use token_manager::BearerTokenManager;
