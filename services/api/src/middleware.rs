//! Session cookie authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, session::SESSION_COOKIE, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Authentication middleware
///
/// A missing or empty session cookie is `Unauthenticated`; a token that fails
/// signature or expiry checks is `Forbidden`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Unauthenticated)?;

    let id = state.sessions.verify(token).map_err(|e| {
        debug!("Rejected session cookie: {}", e);
        ApiError::Forbidden
    })?;

    req.extensions_mut().insert(AuthUser { id });

    Ok(next.run(req).await)
}
