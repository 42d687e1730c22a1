//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Clock abstraction (system and manual)
//! - Cryptographic utilities (SHA-256 fingerprints, constant-time compare)
//! - Client address extraction
//! - Cooldown table for per-source rate limiting
//! - Outbound HTTP transport with bounded timeouts

pub mod client;
pub mod clock;
pub mod crypto;
pub mod http;
pub mod rate_limit;

#[cfg(any(test, feature = "test-util"))]
pub mod testutil;
