use crate::{auth::SESSION_COOKIE, state::AppState};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct SessionUser(Uuid);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Attaches the logged-in user, if any, to the request. Requests without a
/// valid session continue anonymously.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()));

    if let Some(token) = token {
        match state.auth_service.session_user(&token).await {
            Ok(user_id) => {
                req.extensions_mut().insert(SessionUser(user_id));
            }
            Err(e) => tracing::debug!("ignoring session token: {}", e),
        }
    }

    next.run(req).await
}

// Extractor for the optional session user set by `session_middleware`
pub struct CurrentUser(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(
            parts
                .extensions
                .get::<SessionUser>()
                .map(|session| session.0),
        ))
    }
}
