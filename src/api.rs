//! HTTP helpers for the hosted service with consistent timeouts and error
//! handling. The auth client and the ticket fetcher build requests through
//! `ApiClient` so every call carries the `apikey` header, the user agent and the
//! default timeout. Tokens are attached by callers and never logged here.

use crate::{APP_USER_AGENT, config::AppConfig, errors::AppError};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout applied to every request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Thin wrapper around `reqwest::Client` bound to one service project.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    anon_key: SecretString,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Builds a URL from the configured base URL and the provided path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Starts a request carrying the `apikey` and JSON content-type headers.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", self.anon_key.expose_secret())
            .header("Content-Type", "application/json")
    }

    /// Same as `request`, plus `Authorization: Bearer <token>`.
    pub fn authorized(&self, method: Method, path: &str, token: &SecretString) -> RequestBuilder {
        self.request(method, path).bearer_auth(token.expose_secret())
    }
}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
///
/// # Errors
/// Returns `AppError::Http` on a non-success status and `AppError::Parse` if
/// the body does not decode into `T`.
pub async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status,
            message: sanitize_body(&body),
        })
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
