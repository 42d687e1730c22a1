//! Request guards and extractors

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use platform::client::client_address;
use platform::http::HttpTransport;

use crate::domain::repository::QaRepository;
use crate::error::FaqError;
use crate::presentation::handlers::FaqAppState;

/// Caller address: first `X-Forwarded-For` hop, else the socket peer
#[derive(Debug, Clone)]
pub struct ClientAddress(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddress {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(ClientAddress(client_address(&parts.headers, direct)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a live admin session token
pub async fn require_admin_session<R, T>(
    State(state): State<FaqAppState<R, T>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, FaqError>
where
    R: QaRepository + Send + Sync + 'static,
    T: HttpTransport + Send + Sync + 'static,
{
    let authorized = bearer_token(req.headers()).is_some_and(|t| state.access.check_token(t));
    if !authorized {
        return Err(FaqError::SessionInvalid);
    }

    Ok(next.run(req).await)
}
