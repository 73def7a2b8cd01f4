#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{rejection::PathRejection, Path},
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use connectnow_console::{
    build_app,
    config::Config,
    login_routes,
    services::admin_session::ADMIN_SESSION_COOKIE,
    state::{AppState, SecretSource},
};

pub const SECRET: &str = "integration-test-session-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse";
pub const BACKEND_TOKEN: &str = "backend-access-token-xyz";

/// Fake messaging backend.
///
/// - `POST /admin/auth/login` issues `BACKEND_TOKEN` for the admin credentials;
///   `broken@example.com` gets a reply without a usable token and
///   `down@example.com` gets a 503.
/// - Anything else under `/admin/` is echoed back as JSON.
fn fake_backend() -> Router {
    async fn login(Json(body): Json<Value>) -> Response {
        match (body["email"].as_str(), body["password"].as_str()) {
            (Some(ADMIN_EMAIL), Some(ADMIN_PASSWORD)) => Json(json!({
                "accessToken": BACKEND_TOKEN,
                "expiresInSeconds": 3600
            }))
            .into_response(),
            (Some("broken@example.com"), _) => Json(json!({
                "accessToken": "",
                "expiresInSeconds": 3600
            }))
            .into_response(),
            (Some("forever@example.com"), _) => Json(json!({
                "accessToken": BACKEND_TOKEN,
                "expiresInSeconds": -1
            }))
            .into_response(),
            (Some("down@example.com"), _) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad credentials" })))
                .into_response(),
        }
    }

    async fn echo(
        path: Result<Path<String>, PathRejection>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        // Undecodable escapes (e.g. `%FF`) are still echoed through `rawPath`.
        let path = path.map(|Path(path)| path).unwrap_or_default();

        if path == "missing" {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": "no such org" }))).into_response();
        }

        Json(json!({
            "method": method.as_str(),
            "path": path,
            "rawPath": uri.path(),
            "query": uri.query(),
            "authorization": header_str(header::AUTHORIZATION),
            "contentType": header_str(header::CONTENT_TYPE),
            "body": String::from_utf8_lossy(&body),
        }))
        .into_response()
    }

    Router::new()
        .route("/admin/auth/login", post(login))
        .route("/admin/{*path}", any(echo))
}

/// Serves the fake backend on an ephemeral port and returns its base URL.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");

    tokio::spawn(async move {
        axum::serve(listener, fake_backend())
            .await
            .expect("fake backend crashed");
    });

    format!("http://{}", addr)
}

pub fn state_for(backend_url: &str, secret: Option<&str>) -> AppState {
    AppState::new(
        &Config::for_backend(backend_url),
        SecretSource::Fixed(secret.map(str::to_string)),
    )
    .expect("state")
}

/// The full console router against a live fake backend.
pub async fn app() -> Router {
    let backend = spawn_backend().await;
    build_app(state_for(&backend, Some(SECRET)), login_routes())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("infallible")
}

pub async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).expect("json body")
}

pub fn get(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("{}={}", ADMIN_SESSION_COOKIE, token));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Extracts the session cookie value from a response's `Set-Cookie` headers.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", ADMIN_SESSION_COOKIE)))
        .map(str::to_string)
}

/// Logs in against the fake backend and returns the raw session token.
pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        post_json(
            "/api/admin/auth/login",
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = session_cookie(&response).expect("session cookie");
    let pair = set_cookie.split(';').next().expect("cookie pair");
    pair.split_once('=').expect("name=value").1.to_string()
}
