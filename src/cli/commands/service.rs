use crate::config::{ENV_ANON_KEY, ENV_API_BASE_URL, ENV_SITE_URL};
use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_ANON_KEY: &str = "anon-key";
pub const ARG_SITE_URL: &str = "site-url";

/// Hosted service endpoints. Unset values fall back to the build-time config.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the hosted service, example: https://<project>.supabase.co")
                .env(ENV_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ANON_KEY)
                .long(ARG_ANON_KEY)
                .help("Public (anon) API key of the hosted service")
                .env(ENV_ANON_KEY)
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_SITE_URL)
                .long(ARG_SITE_URL)
                .help("Public URL of this app, used for password recovery links")
                .env(ENV_SITE_URL)
                .global(true),
        )
}
