//! FAQ Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use platform::http::HttpTransport;

use crate::application::AccessControl;
use crate::domain::repository::QaRepository;
use crate::presentation::handlers::{self, FaqAppState};
use crate::presentation::middleware::require_admin_session;

/// Public page, question submission and the `/admin` moderation API
pub fn faq_router<R, T>(repo: Arc<R>, access: Arc<AccessControl<T>>) -> Router
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let state = FaqAppState { repo, access };

    let admin = Router::new()
        .route("/entries", get(handlers::list_entries::<R, T>))
        .route(
            "/entries/{id}",
            put(handlers::answer_entry::<R, T>).delete(handlers::delete_entry::<R, T>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session::<R, T>,
        ))
        .route("/login", post(handlers::login::<R, T>));

    Router::new()
        .route("/faq", get(handlers::faq_page::<R, T>))
        .route("/question", post(handlers::submit_question::<R, T>))
        .nest("/admin", admin)
        .with_state(state)
}
