//! HTTP Handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use platform::http::HttpTransport;

use crate::application::{
    AccessControl, FaqPageUseCase, ModerationUseCase, SubmitQuestionInput, SubmitQuestionUseCase,
};
use crate::domain::repository::QaRepository;
use crate::error::FaqResult;
use crate::presentation::dto::{
    AnswerRequest, EntryListResponse, FaqPageResponse, LoginRequest, LoginResponse,
    SubmitQuestionForm, SubmitQuestionResponse,
};
use crate::presentation::middleware::ClientAddress;

/// Shared state for FAQ handlers
pub struct FaqAppState<R, T> {
    pub repo: Arc<R>,
    pub access: Arc<AccessControl<T>>,
}

impl<R, T> Clone for FaqAppState<R, T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            access: self.access.clone(),
        }
    }
}

// ============================================================================
// Public
// ============================================================================

/// GET /faq
pub async fn faq_page<R, T>(
    State(state): State<FaqAppState<R, T>>,
    ClientAddress(address): ClientAddress,
) -> Json<FaqPageResponse>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let output = FaqPageUseCase::new(state.repo.clone(), state.access.clone())
        .execute(&address)
        .await;

    Json(FaqPageResponse {
        captcha_client: output.captcha_client,
        can_ask: output.can_ask,
        count: output.entries.len(),
        entries: output.entries,
    })
}

/// POST /question
pub async fn submit_question<R, T>(
    State(state): State<FaqAppState<R, T>>,
    ClientAddress(address): ClientAddress,
    Form(form): Form<SubmitQuestionForm>,
) -> FaqResult<impl IntoResponse>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let input = SubmitQuestionInput {
        order_hint: form.order_hint(),
        question: form.question,
        captcha_response: form.captcha_response,
    };

    SubmitQuestionUseCase::new(state.repo.clone(), state.access.clone())
        .execute(input, &address)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuestionResponse {
            message: "Your question has been sent, thank you!".to_string(),
        }),
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /admin/login
pub async fn login<R, T>(
    State(state): State<FaqAppState<R, T>>,
    Json(req): Json<LoginRequest>,
) -> FaqResult<Json<LoginResponse>>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let token = state.access.authenticate(&req.login, &req.password)?;
    Ok(Json(LoginResponse {
        token: token.value,
        expires_at_ms: token.expires_at_ms,
    }))
}

/// GET /admin/entries
pub async fn list_entries<R, T>(
    State(state): State<FaqAppState<R, T>>,
) -> FaqResult<Json<EntryListResponse>>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let entries = ModerationUseCase::new(state.repo.clone()).list_all().await?;
    Ok(Json(EntryListResponse {
        count: entries.len(),
        entries,
    }))
}

/// PUT /admin/entries/{id}
pub async fn answer_entry<R, T>(
    State(state): State<FaqAppState<R, T>>,
    Path(id): Path<i64>,
    Json(req): Json<AnswerRequest>,
) -> FaqResult<StatusCode>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    ModerationUseCase::new(state.repo.clone())
        .answer(id, &req.answer, req.validated)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/entries/{id}
pub async fn delete_entry<R, T>(
    State(state): State<FaqAppState<R, T>>,
    Path(id): Path<i64>,
) -> FaqResult<StatusCode>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    ModerationUseCase::new(state.repo.clone())
        .delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
