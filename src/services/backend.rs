use axum::body::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Backend endpoint that exchanges admin credentials for an access token.
const ADMIN_LOGIN_PATH: &str = "/admin/auth/login";

#[derive(Serialize)]
struct BackendLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// What the backend returns on a successful admin login.
///
/// Both fields are optional so that a malformed reply is reported as a bad
/// gateway rather than a decode error.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackendLoginResponse {
    pub access_token: Option<String>,
    pub expires_in_seconds: Option<f64>,
}

/// A backend reply relayed as-is to the console.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Authenticates admin credentials against the backend.
pub async fn authenticate_admin(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<BackendLoginResponse> {
    let url = format!("{}{}", state.config.backend_url, ADMIN_LOGIN_PATH);
    tracing::debug!("🔐 Forwarding admin login to {}", url);

    let response = state
        .http
        .post(&url)
        .json(&BackendLoginRequest { email, password })
        .send()
        .await?;

    let status = response.status();
    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    ) {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }
    if !status.is_success() {
        return Err(AppError::BadGateway(format!(
            "Authentication service returned {}",
            status.as_u16()
        )));
    }

    let body = response.bytes().await?;
    sonic_rs::from_slice(&body).map_err(|e| {
        tracing::warn!("❌ Unparseable login response: {}", e);
        AppError::BadGateway("Invalid response from authentication service".to_string())
    })
}

/// Whether a raw path segment is `.` or `..`, literally or percent-encoded.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Joins a still-encoded admin API path onto `{backend_url}/admin/`.
///
/// Escapes are forwarded untouched, so `%3F` and `%2F` stay inside their
/// segment. Dot segments are rejected, and the joined URL must remain under
/// the backend's `/admin/` prefix.
pub fn admin_url(backend_url: &str, raw_path: &str, query: Option<&str>) -> Result<Url> {
    let invalid = || AppError::Validation("Invalid admin API path".to_string());

    if raw_path.split(['/', '\\']).any(is_dot_segment) {
        return Err(invalid());
    }

    let base = Url::parse(&format!("{}/admin/", backend_url))
        .map_err(|e| AppError::Internal(format!("Invalid backend URL: {}", e)))?;

    let mut joined = format!("{}{}", base, raw_path);
    if let Some(query) = query {
        joined.push('?');
        joined.push_str(query);
    }

    let url = Url::parse(&joined).map_err(|_| invalid())?;
    if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
        return Err(invalid());
    }

    Ok(url)
}

/// Sends an admin API call to the backend on behalf of the console.
///
/// `raw_path` is the undecoded request path below `/api/admin/`.
pub async fn forward(
    state: &AppState,
    method: Method,
    raw_path: &str,
    query: Option<&str>,
    auth_headers: HeaderMap,
    content_type: Option<&HeaderValue>,
    body: Bytes,
) -> Result<ProxiedResponse> {
    let url = admin_url(&state.config.backend_url, raw_path, query)?;
    tracing::debug!("➡️ {} {}", method, url.path());

    let mut request = state.http.request(method, url).headers(auth_headers);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type.clone());
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    let body = response.bytes().await?;

    tracing::debug!("⬅️ {} from backend ({} bytes)", status.as_u16(), body.len());

    Ok(ProxiedResponse {
        status,
        content_type,
        body,
    })
}
