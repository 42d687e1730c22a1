//! Domain Value Objects

use derive_more::Display;

use crate::error::{FaqError, FaqResult};

/// Maximum length of a visitor question, in characters
pub const QUESTION_MAX_CHARS: usize = 200;

/// One-way fingerprint of a caller's network address.
///
/// SHA-256, hex encoded. The raw address is never kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct AddressFingerprint(String);

impl AddressFingerprint {
    pub fn of(raw_address: &str) -> Self {
        Self(platform::crypto::sha256_hex(raw_address.as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A visitor question that passed the length check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn parse(text: impl Into<String>) -> FaqResult<Self> {
        let text = text.into();
        if text.chars().count() > QUESTION_MAX_CHARS {
            return Err(FaqError::QuestionTooLong {
                max: QUESTION_MAX_CHARS,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Status column of the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SheetStatus {
    #[display("Validé")]
    Validated,
    #[display("Rédaction")]
    Draft,
}

impl SheetStatus {
    pub const VALIDATED: &'static str = "Validé";
    pub const DRAFT: &'static str = "Rédaction";

    pub fn is_validated(cell: &str) -> bool {
        cell == Self::VALIDATED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_fixed_length_hex() {
        let fp = AddressFingerprint::of("203.0.113.7");
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!fp.as_str().contains("203.0.113.7"));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(AddressFingerprint::of("::1"), AddressFingerprint::of("::1"));
        assert_ne!(AddressFingerprint::of("::1"), AddressFingerprint::of("::2"));
    }

    #[test]
    fn test_question_length_counts_characters() {
        assert!(Question::parse("é".repeat(200)).is_ok());
        assert!(matches!(
            Question::parse("a".repeat(201)),
            Err(FaqError::QuestionTooLong { max: 200 })
        ));
        assert!(Question::parse("").is_ok());
    }

    #[test]
    fn test_sheet_status_strings() {
        assert_eq!(SheetStatus::Validated.to_string(), SheetStatus::VALIDATED);
        assert_eq!(SheetStatus::Draft.to_string(), SheetStatus::DRAFT);
        assert!(SheetStatus::is_validated("Validé"));
        assert!(!SheetStatus::is_validated("Rédaction"));
        assert!(!SheetStatus::is_validated("valide"));
    }
}
