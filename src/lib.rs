//! # ticketdesk
//!
//! Client for a hosted backend-as-a-service (GoTrue auth + REST data API):
//! account registration, password sign-in, password recovery and a ticket
//! list. Password hashing, token issuance, email delivery and ticket storage
//! all live on the hosted service.
//!
//! ## Session lifecycle
//!
//! 1. `auth::AuthProvider` is mounted once and publishes `Resolving`, then
//!    `Authenticated` or `Unauthenticated`, following the client's events.
//! 2. Screens in `routes` drive the credential flows and move the app through a
//!    `routes::Navigator`. Recovery and reset end in a cancellable cooldown
//!    before returning to `/login`.
//! 3. `auth::RequireAuth` keeps `/dashboard` and `/tickets` behind sign-in.
//! 4. `tickets` reads the collection with the session's bearer token.
//!
//! The `ticketdesk` binary is a terminal front end over the same screens.

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod errors;
pub mod routes;
pub mod tickets;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::AppConfig;
pub use errors::AppError;

pub const GIT_COMMIT_HASH: &str = env!("TICKETDESK_GIT_SHA");

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
