use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
};
use super::{
    auth_dto::{LoginForm, SignupForm, SignupRejected},
    auth_service::SignupOutcome,
};

pub const SESSION_COOKIE: &str = "session";

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Register a new user and start a session
#[utoipa::path(
    post,
    path = "/signup/",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed up, redirect to today's tasks"),
        (status = 400, description = "Signup rejected", body = SignupRejected)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    if current.is_some() {
        return Ok(Redirect::to("/tasks/").into_response());
    }

    match state.auth_service.signup(&form).await? {
        SignupOutcome::Created { token, .. } => Ok((
            jar.add(session_cookie(token)),
            Redirect::to("/tasks/?filter=today"),
        )
            .into_response()),
        SignupOutcome::Rejected(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(SignupRejected {
                errors,
                username: form.username,
                email: form.email,
            }),
        )
            .into_response()),
    }
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/login/",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirect to today's tasks"),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if current.is_some() {
        return Ok(Redirect::to("/tasks/").into_response());
    }

    let (_user, token) = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok((
        jar.add(session_cookie(token)),
        Redirect::to("/tasks/?filter=today"),
    )
        .into_response())
}

/// End the session
#[utoipa::path(
    post,
    path = "/logout/",
    responses(
        (status = 303, description = "Logged out, redirect to the login page")
    ),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/login/"),
    )
}
