//! Password-recovery links. The provider redirects to
//! `<site>/reset-password#access_token=…&refresh_token=…&type=recovery`; the
//! fragment carries a short-lived session that authorizes the password update.
//! Tokens are moved straight into `SecretString` and never logged.

use crate::{
    auth::types::{Session, unix_now},
    errors::AppError,
};
use secrecy::SecretString;
use std::collections::HashMap;
use url::{Url, form_urlencoded};

const INVALID_LINK: &str = "Password reset link is invalid or has expired";

/// Parses the session out of a recovery link. Accepts a full URL, a path with
/// its fragment, or just the fragment (with or without the leading `#`).
///
/// # Errors
/// Returns `AppError::Provider` with the provider's `error_description` when the
/// link reports an error, or a fixed message when no access token is present.
pub fn parse_recovery_fragment(link: &str) -> Result<Session, AppError> {
    let link = link.trim();
    let fragment = match link.split_once('#') {
        Some((_, fragment)) => fragment,
        // A full URL without a fragment carries no session.
        None if Url::parse(link).is_ok() => "",
        None => link,
    };

    let params: HashMap<String, String> = form_urlencoded::parse(fragment.as_bytes())
        .into_owned()
        .collect();

    if let Some(description) = params.get("error_description") {
        return Err(AppError::Provider(description.clone()));
    }

    let access_token = params
        .get("access_token")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Provider(INVALID_LINK.to_string()))?;

    if let Some(kind) = params.get("type") {
        if kind != "recovery" {
            return Err(AppError::Provider(INVALID_LINK.to_string()));
        }
    }

    let now = unix_now();
    let expires_in = params
        .get("expires_in")
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(3600);
    let expires_at = params
        .get("expires_at")
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| now.saturating_add(expires_in));

    Ok(Session {
        access_token: SecretString::from(access_token.clone()),
        refresh_token: params
            .get("refresh_token")
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.clone())),
        token_type: params
            .get("token_type")
            .cloned()
            .unwrap_or_else(|| "bearer".to_string()),
        expires_in,
        expires_at,
        user: None,
    })
}
