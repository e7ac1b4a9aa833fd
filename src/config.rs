//! Build-time configuration for the hosted service endpoints with runtime
//! overrides. Values are read from `option_env!` at compile time, then from the
//! process environment (if present) so a single binary can target different
//! projects without rebuilding. Absence is not validated: an empty base URL or
//! key surfaces later as failed HTTP calls.
//!
//! The anon key is public to any client of the hosted service, but it is still kept
//! in a `SecretString` so it never lands in logs.

use secrecy::SecretString;
use std::env;

pub const ENV_API_BASE_URL: &str = "TICKETDESK_API_BASE_URL";
pub const ENV_ANON_KEY: &str = "TICKETDESK_ANON_KEY";
pub const ENV_SITE_URL: &str = "TICKETDESK_SITE_URL";

const DEFAULT_SITE_URL: &str = "http://localhost:5173";

/// Client configuration: service base URL, public API key and the public URL
/// of this app (used to build password-recovery callback links).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub anon_key: SecretString,
    pub site_url: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = option_env!("TICKETDESK_API_BASE_URL").unwrap_or("");
        let anon_key = option_env!("TICKETDESK_ANON_KEY").unwrap_or("");
        let site_url = option_env!("TICKETDESK_SITE_URL").unwrap_or(DEFAULT_SITE_URL);

        let mut config = Self::new(api_base_url, anon_key, site_url);
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }

    #[must_use]
    pub fn new(api_base_url: &str, anon_key: &str, site_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim().to_string(),
            anon_key: SecretString::from(anon_key.trim().to_string()),
            site_url: site_url.trim().to_string(),
        }
    }

    /// Callback URL sent with recovery emails; points at the reset screen.
    #[must_use]
    pub fn reset_password_url(&self) -> String {
        format!("{}/reset-password", self.site_url.trim_end_matches('/'))
    }
}

#[derive(Default)]
pub(crate) struct RuntimeConfig {
    pub(crate) api_base_url: Option<String>,
    pub(crate) anon_key: Option<String>,
    pub(crate) site_url: Option<String>,
}

pub(crate) fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.anon_key {
        config.anon_key = SecretString::from(value);
    }
    if let Some(value) = runtime.site_url {
        config.site_url = value;
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: read_runtime_value(ENV_API_BASE_URL),
        anon_key: read_runtime_value(ENV_ANON_KEY),
        site_url: read_runtime_value(ENV_SITE_URL),
    }
}

fn read_runtime_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| normalize_runtime_value(&value))
}

pub(crate) fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
