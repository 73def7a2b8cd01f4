use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    error::{AppError, Result},
    services::admin_session::{
        create_admin_session_token, verify_admin_session_token, ADMIN_SESSION_COOKIE,
    },
    services::backend,
    state::AppState,
    validation::auth::*,
};

/// The request payload for admin login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The response payload for login and logout.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for session introspection.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub authenticated: bool,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Creates the session cookie with the given value and max age.
fn create_session_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(ADMIN_SESSION_COOKIE, value);

    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_secs));
    cookie.set_path("/");

    cookie
}

/// Handles admin login: exchanges credentials with the backend and seals the
/// returned access token into the session cookie.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let secret = state.secret.require()?;

    tracing::info!("🔐 Admin login attempt");

    let backend_session =
        backend::authenticate_admin(&state, payload.email.trim(), &payload.password).await?;

    let access_token = validate_access_token(backend_session.access_token.as_deref())?;
    let expires_in_seconds = validate_session_lifetime(backend_session.expires_in_seconds)?;

    let token = create_admin_session_token(&secret, access_token, expires_in_seconds)?;
    cookies.add(create_session_cookie(
        token,
        expires_in_seconds,
        state.config.is_production,
    ));

    tracing::info!("✅ Admin session issued ({}s)", expires_in_seconds);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles admin logout. Always succeeds, with or without a session.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Response {
    let mut session_cookie = Cookie::new(ADMIN_SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    tracing::info!("👋 Admin session cleared");

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Reports the lifetime of the current session without exposing the token.
#[axum::debug_handler]
pub async fn session(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let secret = state.secret.require()?;
    let token = cookies
        .get(ADMIN_SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let payload = verify_admin_session_token(token.as_deref(), &secret)
        .into_payload()
        .ok_or(AppError::Unauthorized)?;

    let info = SessionInfo {
        authenticated: true,
        issued_at: payload.iat,
        expires_at: payload.exp,
    };

    Ok((StatusCode::OK, Json(info)).into_response())
}
