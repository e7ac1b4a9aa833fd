//! Screens and client-side navigation. Each screen is a controller owning its
//! form draft and banner message; it talks to the auth client through the
//! `AuthClient` trait and moves between screens through a `Navigator`.

mod dashboard;
mod forgot_password;
mod home;
mod login;
mod register;
mod reset_password;
mod tickets;

pub use dashboard::DashboardPage;
pub use forgot_password::ForgotPasswordPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use reset_password::ResetPasswordPage;
pub use tickets::TicketsPage;

use crate::countdown::Countdown;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tokio::sync::watch;
use tracing::info;

/// Seconds between a successful recovery/reset and the redirect to login.
pub const REDIRECT_COOLDOWN_SECONDS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Register,
    Login,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Tickets,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword => "/reset-password",
            Route::Dashboard => "/dashboard",
            Route::Tickets => "/tickets",
        }
    }

    /// Screens that need an authenticated session.
    #[must_use]
    pub fn is_gated(self) -> bool {
        matches!(self, Route::Dashboard | Route::Tickets)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the app to another screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that publishes the current route to any number of watchers.
pub struct Router {
    current: watch::Sender<Route>,
}

impl Router {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    #[must_use]
    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let from = self.current.send_replace(route);
        info!(from = %from, to = %route, "navigate");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Banner shown above a screen's form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

/// Result of pressing a screen's submit button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Local validation failed; nothing was sent.
    Invalid,
    /// The provider rejected the request; the form stays usable.
    Rejected,
    Accepted,
}

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// Checks a required email field, returning the banner to show on failure.
pub(crate) fn check_email(email: &str) -> Result<(), Message> {
    if email.trim().is_empty() {
        return Err(Message::error("Email is required."));
    }
    if !valid_email(email) {
        return Err(Message::error("Email address looks invalid."));
    }
    Ok(())
}

pub(crate) fn check_password(password: &str) -> Result<(), Message> {
    if password.trim().is_empty() {
        return Err(Message::error("Password is required."));
    }
    Ok(())
}

/// Starts the post-success cooldown that ends on `route`.
pub(crate) fn redirect_after_cooldown(navigator: &Arc<dyn Navigator>, route: Route) -> Countdown {
    let navigator = Arc::clone(navigator);
    Countdown::start(REDIRECT_COOLDOWN_SECONDS, move || navigator.navigate(route))
}
