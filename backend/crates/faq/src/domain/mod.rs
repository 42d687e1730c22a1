//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (QaRecord, SessionToken, BearerCredential)
//! - Domain value objects (AddressFingerprint, Question, SheetStatus)
//! - Repository trait (the storage capability contract)

pub mod entities;
pub mod repository;
pub mod value_objects;
