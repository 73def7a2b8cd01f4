use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    services::admin_session::{verify_admin_session_token, ADMIN_SESSION_COOKIE},
    services::backend,
    state::AppState,
};

/// Builds the `Authorization` header for a backend call from the admin session cookie.
///
/// The cookie is verified again here; the session middleware does not hand
/// anything down to handlers.
pub fn get_admin_auth_headers(cookies: &Cookies, secret: &str) -> Result<HeaderMap> {
    let token = cookies
        .get(ADMIN_SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let payload = verify_admin_session_token(token.as_deref(), secret)
        .into_payload()
        .ok_or(AppError::Unauthorized)?;

    let mut value = HeaderValue::from_str(&format!("Bearer {}", payload.access_token))
        .map_err(|_| AppError::Unauthorized)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value);
    Ok(headers)
}

/// Relays `/api/admin/{*path}` to the backend's `/admin/{path}`.
///
/// The path is taken from the raw request URI, still percent-encoded.
///
/// Covers org management, templates, campaigns, conversations, dashboards,
/// settings and guest-CSV imports (multipart bodies are passed through).
pub async fn forward_admin_api(
    State(state): State<AppState>,
    cookies: Cookies,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let secret = state.secret.require()?;
    let auth_headers = get_admin_auth_headers(&cookies, &secret)?;

    let raw_path = uri
        .path()
        .strip_prefix("/api/admin/")
        .ok_or_else(|| AppError::Validation("Invalid admin API path".to_string()))?;

    let proxied = backend::forward(
        &state,
        method,
        raw_path,
        uri.query(),
        auth_headers,
        headers.get(header::CONTENT_TYPE),
        body,
    )
    .await?;

    let mut response = (proxied.status, proxied.body).into_response();
    if let Some(content_type) = proxied.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }

    Ok(response)
}
