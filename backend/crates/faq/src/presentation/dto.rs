//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::QaRecord;

// ============================================================================
// Public Page
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPageResponse {
    pub captcha_client: String,
    pub can_ask: bool,
    pub entries: Vec<QaRecord>,
    pub count: usize,
}

// ============================================================================
// Question Submission
// ============================================================================

/// Form posted by the public page
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuestionForm {
    #[serde(rename = "input-question", default)]
    pub question: String,
    #[serde(rename = "g-recaptcha-response", default)]
    pub captcha_response: String,
    /// Entry count the visitor saw; a hint only
    #[serde(rename = "numQuestion", default)]
    pub num_question: Option<String>,
}

impl SubmitQuestionForm {
    /// Unparseable hints count as zero
    pub fn order_hint(&self) -> u32 {
        self.num_question
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuestionResponse {
    pub message: String,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<QaRecord>,
    pub count: usize,
}

/// Moderation request
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
    #[serde(default)]
    pub validated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_hint_is_best_effort() {
        let form = |n: Option<&str>| SubmitQuestionForm {
            question: String::new(),
            captcha_response: String::new(),
            num_question: n.map(str::to_string),
        };
        assert_eq!(form(Some("12")).order_hint(), 12);
        assert_eq!(form(Some(" 3 ")).order_hint(), 3);
        assert_eq!(form(Some("douze")).order_hint(), 0);
        assert_eq!(form(Some("-1")).order_hint(), 0);
        assert_eq!(form(None).order_hint(), 0);
    }
}
