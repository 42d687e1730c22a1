//! FAQ Error Types
//!
//! Recoverable failures of the access-control and storage layer. They
//! integrate with the unified `kernel::error::AppError` system at the HTTP
//! edge; none of them is fatal to the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::http::TransportError;
use thiserror::Error;

pub type FaqResult<T> = Result<T, FaqError>;

#[derive(Debug, Error)]
pub enum FaqError {
    /// Bad login or password. Which one is never disclosed.
    #[error("Invalid credentials")]
    AuthFailure,

    /// Admin session token unknown or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Submission cooldown still active for this address
    #[error("Submission cooldown still active")]
    RateLimited,

    /// Captcha rejected or provider unreachable
    #[error("Captcha verification failed")]
    VerificationFailed,

    #[error("Question exceeds {max} characters")]
    QuestionTooLong { max: usize },

    /// The configured backend cannot perform this operation
    #[error("Operation not supported by this backend: {0}")]
    UnsupportedOperation(&'static str),

    /// Transport or parse failure in a storage backend
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl FaqError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FaqError::AuthFailure | FaqError::SessionInvalid => StatusCode::UNAUTHORIZED,
            FaqError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FaqError::VerificationFailed => StatusCode::FORBIDDEN,
            FaqError::QuestionTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FaqError::UnsupportedOperation(_) => StatusCode::NOT_IMPLEMENTED,
            FaqError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FaqError::AuthFailure | FaqError::SessionInvalid => ErrorKind::Unauthorized,
            FaqError::RateLimited => ErrorKind::TooManyRequests,
            FaqError::VerificationFailed => ErrorKind::Forbidden,
            FaqError::QuestionTooLong { .. } => ErrorKind::UnprocessableEntity,
            FaqError::UnsupportedOperation(_) => ErrorKind::NotImplemented,
            FaqError::BackendUnavailable(_) => ErrorKind::ServiceUnavailable,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.public_message());
        match self {
            FaqError::RateLimited => {
                err.with_action("You have already asked a question today, please try again later")
            }
            FaqError::VerificationFailed => {
                err.with_action("Tick the \"I'm not a robot\" box and submit again")
            }
            FaqError::QuestionTooLong { .. } => err.with_action("Please shorten your question"),
            _ => err,
        }
    }

    /// Backend details stay in the logs
    fn public_message(&self) -> String {
        match self {
            FaqError::BackendUnavailable(_) => "Storage backend unavailable".to_string(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            FaqError::BackendUnavailable(detail) => {
                tracing::error!(detail = %detail, "FAQ backend unavailable");
            }
            FaqError::VerificationFailed => {
                tracing::warn!("Captcha verification failed");
            }
            _ => {
                tracing::debug!(error = %self, "FAQ request rejected");
            }
        }
    }
}

impl IntoResponse for FaqError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        err.to_app_error()
    }
}

impl From<sqlx::Error> for FaqError {
    fn from(err: sqlx::Error) -> Self {
        FaqError::BackendUnavailable(format!("database: {err}"))
    }
}

impl From<TransportError> for FaqError {
    fn from(err: TransportError) -> Self {
        FaqError::BackendUnavailable(format!("http: {err}"))
    }
}

impl From<serde_json::Error> for FaqError {
    fn from(err: serde_json::Error) -> Self {
        FaqError::BackendUnavailable(format!("malformed response: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for FaqError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        FaqError::BackendUnavailable(format!("assertion signing: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(FaqError::AuthFailure.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(FaqError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            FaqError::UnsupportedOperation("delete").status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            FaqError::BackendUnavailable("x".into()).kind(),
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_status_and_kind_agree() {
        let all = [
            FaqError::AuthFailure,
            FaqError::SessionInvalid,
            FaqError::RateLimited,
            FaqError::VerificationFailed,
            FaqError::QuestionTooLong { max: 200 },
            FaqError::UnsupportedOperation("update"),
            FaqError::BackendUnavailable("down".into()),
        ];
        for err in all {
            assert_eq!(err.status_code().as_u16(), err.kind().status_code());
        }
    }

    #[test]
    fn test_backend_detail_is_not_public() {
        let app = FaqError::BackendUnavailable("database: disk I/O error at /var/faq.db".into())
            .to_app_error();
        assert!(!app.message().contains("/var/faq.db"));
    }

    #[test]
    fn test_transport_error_maps_to_backend_unavailable() {
        let err: FaqError = TransportError::Timeout.into();
        assert!(matches!(err, FaqError::BackendUnavailable(_)));
    }
}
