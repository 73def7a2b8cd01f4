use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    services::admin_session::{verify_admin_session_token, ADMIN_SESSION_COOKIE},
    state::AppState,
};

/// Console login page; unauthenticated page requests are sent here.
pub const LOGIN_PAGE: &str = "/admin/login";

/// Paths reachable without a session.
const PUBLIC_PATHS: [&str; 3] = [LOGIN_PAGE, "/api/admin/auth/login", "/api/admin/auth/logout"];

/// How the session gate treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    /// Neither `/admin/*` nor `/api/admin/*`.
    Unguarded,
    /// Login/logout endpoints.
    Public,
    /// `/api/admin/*`: failures answer 401 JSON.
    Api,
    /// `/admin/*`: failures redirect to the login page.
    Page,
}

fn in_namespace(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Classifies a request path.
pub fn classify(path: &str) -> RouteScope {
    if PUBLIC_PATHS.contains(&path) {
        RouteScope::Public
    } else if in_namespace(path, "/api/admin") {
        RouteScope::Api
    } else if in_namespace(path, "/admin") {
        RouteScope::Page
    } else {
        RouteScope::Unguarded
    }
}

/// `/admin/login?next=<path>` with the path form-encoded.
pub fn login_redirect_target(path: &str) -> String {
    let next: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?next={}", LOGIN_PAGE, next)
}

/// A middleware that gates the admin namespaces behind a valid session cookie.
///
/// The request is never modified; handlers re-read the cookie themselves.
pub async fn require_admin_session(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let scope = classify(&path);
    if matches!(scope, RouteScope::Unguarded | RouteScope::Public) {
        return next.run(request).await;
    }

    let secret = match state.secret.require() {
        Ok(secret) => secret,
        Err(e) => return e.into_response(),
    };

    let token = cookies
        .get(ADMIN_SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    if verify_admin_session_token(token.as_deref(), &secret).is_valid() {
        tracing::debug!("✅ Admin session accepted for {}", path);
        return next.run(request).await;
    }

    tracing::debug!(
        "🔐 Rejected admin request to {} (cookie present: {})",
        path,
        token.is_some()
    );

    match scope {
        RouteScope::Api => AppError::Unauthorized.into_response(),
        _ => Redirect::temporary(&login_redirect_target(&path)).into_response(),
    }
}
