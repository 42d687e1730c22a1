//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use serde::Serialize;

/// One question/answer unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaRecord {
    /// Backend-assigned: SQLite rowid or spreadsheet number column
    pub id: i64,
    pub question: String,
    /// Empty until moderated
    pub answer: String,
    pub asked_at: Option<DateTime<Utc>>,
    pub answered_at: Option<DateTime<Utc>>,
    pub validated: bool,
}

/// Administrator session token, valid until `expires_at_ms`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub expires_at_ms: i64,
}

impl SessionToken {
    /// Mint a fresh time-ordered token
    pub fn issue(expires_at_ms: i64) -> Self {
        Self {
            value: SessionId::new().to_string(),
            expires_at_ms,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }
}

/// OAuth2 access token for the spreadsheet API
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential {
    pub value: String,
    pub expires_at_ms: i64,
}

impl BearerCredential {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.value.is_empty() && now_ms < self.expires_at_ms
    }
}

impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerCredential")
            .field("value", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}
