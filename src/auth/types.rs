//! Session, user and auth-change types. Sessions carry bearer and refresh
//! tokens, so token fields are `SecretString` and must never be logged.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds before `expires_at` at which a session is already treated as expired.
pub const EXPIRY_MARGIN_SECONDS: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

/// Provider-issued proof of authentication.
#[derive(Clone, Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub token_type: String,
    pub expires_in: u64,
    /// Unix timestamp (seconds).
    pub expires_at: u64,
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at <= now.saturating_add(EXPIRY_MARGIN_SECONDS)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }
}

/// Wire form of a token grant (`/auth/v1/token`, autoconfirmed `/auth/v1/signup`).
#[derive(Clone, Deserialize)]
pub(crate) struct SessionResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub expires_at: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl SessionResponse {
    pub(crate) fn into_session(self, now: u64) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now.saturating_add(self.expires_in));
        Session {
            access_token: SecretString::from(self.access_token),
            refresh_token: self
                .refresh_token
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            token_type: self.token_type,
            expires_in: self.expires_in,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RecoverRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UpdateUserRequest<'a> {
    pub password: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// Auth-change notification emitted by an `AuthClient`.
#[derive(Clone, Debug)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    /// The user carried by the change, if it carries a session with a user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().and_then(|session| session.user.as_ref())
    }
}

#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn session_response_computes_expiry_when_missing() {
        let response: SessionResponse = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "refresh_token": "refresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": "u-1", "email": "ana@example.com"}
        }))
        .expect("valid session");

        let session = response.into_session(1_000);

        assert_eq!(session.expires_at, 4_600);
        assert_eq!(session.access_token.expose_secret(), "jwt");
        assert_eq!(
            session.refresh_token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("refresh".to_string())
        );
        assert_eq!(
            session.user.and_then(|u| u.email),
            Some("ana@example.com".to_string())
        );
    }

    #[test]
    fn session_expires_within_margin() {
        let session = Session {
            access_token: SecretString::from("jwt".to_string()),
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_in: 60,
            expires_at: 1_060,
            user: None,
        };

        assert!(!session.is_expired_at(1_000));
        assert!(session.is_expired_at(1_050));
        assert!(session.is_expired_at(2_000));
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = Session {
            access_token: SecretString::from("super-secret-jwt".to_string()),
            refresh_token: Some(SecretString::from("super-secret-refresh".to_string())),
            token_type: "bearer".to_string(),
            expires_in: 60,
            expires_at: 60,
            user: None,
        };

        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret"));
    }
}
