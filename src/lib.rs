//! Backend-for-frontend for the ConnectNow admin console.
//!
//! Admin pages (`/admin/*`) and admin API calls (`/api/admin/*`) are gated by
//! a stateless session cookie that seals the backend's access token with
//! AES-256-GCM and signs the result with HMAC-SHA256. Authenticated API calls
//! are relayed to the messaging backend with that token as a bearer credential.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{any, get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;

pub mod config;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod aes;
    pub mod codec;
    pub mod signing;
}

pub mod models {
    pub mod session;
}

pub mod services {
    pub mod admin_session;
    pub mod backend;
}

pub mod handlers {
    pub mod auth;
    pub mod proxy;
}

pub mod middleware_layer {
    pub mod admin_auth;
}

pub mod validation {
    pub mod auth;
}

use state::AppState;

/// Largest request body relayed to the backend (guest CSV uploads).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// The public login route, kept separate so the binary can rate-limit it.
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/api/admin/auth/login", post(handlers::auth::login))
}

/// Assembles the console router around `login`.
///
/// Cookie handling wraps the session gate, which wraps every route.
pub fn build_app(state: AppState, login: Router<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/admin/auth/logout", post(handlers::auth::logout))
        .route("/api/admin/auth/session", get(handlers::auth::session))
        .route("/api/admin/{*path}", any(handlers::proxy::forward_admin_api))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .merge(login)
        .merge(api_routes)
        .nest_service("/admin", ServeDir::new(&state.config.console_dir))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::admin_auth::require_admin_session,
        ))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
