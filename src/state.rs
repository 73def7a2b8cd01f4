use std::env;

use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Environment variable holding the admin session key material.
pub const SESSION_SECRET_ENV: &str = "ADMIN_SESSION_SECRET";

/// Where the admin session secret comes from.
///
/// The secret is resolved on every call and never cached in the state.
#[derive(Clone, Debug)]
pub enum SecretSource {
    /// Read `ADMIN_SESSION_SECRET` from the process environment on each use.
    Env,
    /// A fixed value (or a fixed absence), used by tests.
    Fixed(Option<String>),
}

impl SecretSource {
    /// Resolves the secret. Empty values count as unset.
    pub fn load(&self) -> Option<Zeroizing<String>> {
        let value = match self {
            SecretSource::Env => env::var(SESSION_SECRET_ENV).ok(),
            SecretSource::Fixed(value) => value.clone(),
        };

        value.filter(|v| !v.is_empty()).map(Zeroizing::new)
    }

    /// Resolves the secret or fails with the operator-facing diagnostic.
    pub fn require(&self) -> Result<Zeroizing<String>> {
        self.load().ok_or_else(|| {
            AppError::Configuration(format!("{} is not configured", SESSION_SECRET_ENV))
        })
    }
}

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Source of the admin session secret.
    pub secret: SecretSource,
    /// Shared client for calls to the backend.
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    /// * `secret` - Where to read the admin session secret from.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config, secret: SecretSource) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.backend_timeout)
            .build()?;
        tracing::info!("✅ Backend HTTP client initialized ({})", config.backend_url);

        Ok(AppState {
            config: config.clone(),
            secret,
            http,
        })
    }
}
