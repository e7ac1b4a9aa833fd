//! `AuthClient` backed by the hosted GoTrue API (`/auth/v1`).
//!
//! Flow Overview:
//! 1. `sign_in`/`sign_up` exchange credentials for a session, cache it and emit
//!    `SignedIn`.
//! 2. `get_session` returns the cached session, refreshing it through the
//!    `refresh_token` grant once it is within the expiry margin. A failed
//!    refresh clears the cache and emits `SignedOut`.
//! 3. `recover_session` installs the session carried by a recovery link and
//!    emits `PasswordRecovery`; `update_password` then acts on that session.
//!
//! Provider error text is surfaced as `AppError::Provider` so screens can show
//! it verbatim. Request bodies carry passwords and are never logged.

use crate::{
    api::{ApiClient, sanitize_body},
    auth::{
        client::AuthClient,
        types::{
            AuthChange, AuthEvent, PasswordGrantRequest, RecoverRequest, RefreshTokenRequest,
            Session, SessionResponse, UpdateUserRequest, User, unix_now,
        },
    },
    config::AppConfig,
    errors::AppError,
};
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{Instrument, debug, error, info, info_span, instrument};

const EVENT_CHANNEL_CAPACITY: usize = 16;

pub struct GoTrueClient {
    api: ApiClient,
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<AuthChange>,
}

impl GoTrueClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    #[must_use]
    pub fn with_api(api: ApiClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    async fn store(&self, session: Option<Session>, event: AuthEvent) {
        {
            let mut guard = self.session.write().await;
            guard.clone_from(&session);
        }
        debug!(?event, "auth state change");
        // No receivers is fine: nobody is listening yet.
        let _ = self.events.send(AuthChange { event, session });
    }

    async fn cached(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<Session, AppError> {
        let span = info_span!(
            "gotrue.refresh",
            http.method = "POST",
            url = %self.api.url("/auth/v1/token")
        );
        let response = self
            .api
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        let grant: SessionResponse = provider_json(response).await?;
        Ok(grant.into_session(unix_now()))
    }

    async fn fetch_user(&self, token: &SecretString) -> Result<Option<User>, AppError> {
        let span = info_span!(
            "gotrue.get_user",
            http.method = "GET",
            url = %self.api.url("/auth/v1/user")
        );
        let response = self
            .api
            .authorized(Method::GET, "/auth/v1/user", token)
            .send()
            .instrument(span)
            .await?;

        // An invalid or revoked token means "no user", not a failure.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        provider_json(response).await.map(Some)
    }
}

#[async_trait]
impl AuthClient for GoTrueClient {
    async fn get_user(&self) -> Result<Option<User>, AppError> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };
        self.fetch_user(&session.access_token).await
    }

    #[instrument(skip_all)]
    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        let Some(session) = self.cached().await else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            info!("session expired without refresh token");
            self.store(None, AuthEvent::SignedOut).await;
            return Ok(None);
        };

        match self.refresh(&refresh_token).await {
            Ok(mut refreshed) => {
                if refreshed.user.is_none() {
                    refreshed.user = session.user;
                }
                self.store(Some(refreshed.clone()), AuthEvent::TokenRefreshed)
                    .await;
                Ok(Some(refreshed))
            }
            Err(err) => {
                error!("Failed to refresh session: {}", err);
                self.store(None, AuthEvent::SignedOut).await;
                Err(err)
            }
        }
    }

    #[instrument(skip_all)]
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AppError> {
        let span = info_span!(
            "gotrue.sign_in",
            http.method = "POST",
            url = %self.api.url("/auth/v1/token")
        );
        let response = self
            .api
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        let grant: SessionResponse = provider_json(response).await?;
        let session = grant.into_session(unix_now());
        self.store(Some(session.clone()), AuthEvent::SignedIn).await;
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Option<Session>, AppError> {
        let span = info_span!(
            "gotrue.sign_up",
            http.method = "POST",
            url = %self.api.url("/auth/v1/signup")
        );
        let response = self
            .api
            .request(Method::POST, "/auth/v1/signup")
            .json(&PasswordGrantRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        let body: Value = provider_json(response).await?;

        // With email confirmation enabled the provider answers with the bare user.
        if body.get("access_token").is_none() {
            debug!("sign up pending email confirmation");
            return Ok(None);
        }

        let grant: SessionResponse = serde_json::from_value(body)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))?;
        let session = grant.into_session(unix_now());
        self.store(Some(session.clone()), AuthEvent::SignedIn).await;
        Ok(Some(session))
    }

    #[instrument(skip_all)]
    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        let span = info_span!(
            "gotrue.recover",
            http.method = "POST",
            url = %self.api.url("/auth/v1/recover")
        );
        let response = self
            .api
            .request(Method::POST, "/auth/v1/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&RecoverRequest { email })
            .send()
            .instrument(span)
            .await?;

        provider_empty(response).await
    }

    #[instrument(skip_all)]
    async fn update_password(&self, password: &SecretString) -> Result<User, AppError> {
        let Some(mut session) = self.get_session().await? else {
            return Err(AppError::Provider("Auth session missing!".to_string()));
        };

        let span = info_span!(
            "gotrue.update_user",
            http.method = "PUT",
            url = %self.api.url("/auth/v1/user")
        );
        let response = self
            .api
            .authorized(Method::PUT, "/auth/v1/user", &session.access_token)
            .json(&UpdateUserRequest {
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        let user: User = provider_json(response).await?;
        session.user = Some(user.clone());
        self.store(Some(session), AuthEvent::UserUpdated).await;
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn recover_session(&self, mut session: Session) -> Result<Session, AppError> {
        if session.user.is_none() {
            session.user = self.fetch_user(&session.access_token).await?;
        }
        if session.user.is_none() {
            return Err(AppError::Provider(
                "Password reset link is invalid or has expired".to_string(),
            ));
        }
        self.store(Some(session.clone()), AuthEvent::PasswordRecovery)
            .await;
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

/// Extracts the provider's error text from a JSON error body.
pub(crate) fn provider_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|json| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str))
        })
        .map_or_else(|| sanitize_body(body), ToString::to_string)
}

async fn provider_error(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!(%status, "provider rejected request");
    AppError::Provider(provider_error_message(&body))
}

async fn provider_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if !response.status().is_success() {
        return Err(provider_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

async fn provider_empty(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(provider_error(response).await)
    }
}
