use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// The application's configuration.
///
/// `ADMIN_SESSION_SECRET` is intentionally absent: it is read on every use
/// through [`crate::state::SecretSource`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the messaging backend, without a trailing slash.
    pub backend_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Whether cookies get the `Secure` attribute.
    pub is_production: bool,
    /// Directory holding the built admin console pages.
    pub console_dir: PathBuf,
    /// Origin allowed to make credentialed cross-origin calls.
    pub cors_origin: String,
    /// Timeout applied to every outbound backend call.
    pub backend_timeout: Duration,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let backend_url = env::var("BACKEND_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_BACKEND_URL"))
            .context("BACKEND_URL (or NEXT_PUBLIC_BACKEND_URL) must be set")?;

        url::Url::parse(&backend_url).context("BACKEND_URL must be an absolute URL")?;

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            is_production: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                == "production",
            console_dir: env::var("CONSOLE_DIR")
                .unwrap_or_else(|_| "console".to_string())
                .into(),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            backend_timeout: Duration::from_secs(
                env::var("BACKEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("Invalid BACKEND_TIMEOUT_SECS")?,
            ),
        })
    }

    /// A configuration suitable for tests: talks to `backend_url`, no `Secure` cookies.
    pub fn for_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            is_production: false,
            console_dir: "console".into(),
            cors_origin: "http://localhost:3000".to_string(),
            backend_timeout: Duration::from_secs(5),
        }
    }
}
