use crate::{
    auth::client::AuthClient,
    countdown::Countdown,
    routes::{Message, Navigator, Route, Submission, check_email, redirect_after_cooldown},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

pub const RESET_EMAIL_SENT: &str = "Password reset email sent! Please check your inbox";

/// `/forgot-password`: requests a password-recovery email, then returns to
/// login after a cooldown.
pub struct ForgotPasswordPage {
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    redirect_to: String,
    email: String,
    message: Option<Message>,
    countdown: Option<Countdown>,
}

impl ForgotPasswordPage {
    /// `redirect_to` is where the emailed link lands, normally the app's
    /// `/reset-password` screen.
    pub fn new(
        client: Arc<dyn AuthClient>,
        navigator: Arc<dyn Navigator>,
        redirect_to: impl Into<String>,
    ) -> Self {
        Self {
            client,
            navigator,
            redirect_to: redirect_to.into(),
            email: String::new(),
            message: None,
            countdown: None,
        }
    }

    /// Ignored once the email has been sent.
    pub fn set_email(&mut self, email: impl Into<String>) {
        if !self.email_sent() {
            self.email = email.into();
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn email_sent(&self) -> bool {
        self.countdown.is_some()
    }

    /// Seconds left before the redirect, 0 when no cooldown runs.
    #[must_use]
    pub fn cooldown(&self) -> u32 {
        self.countdown.as_ref().map_or(0, Countdown::remaining)
    }

    #[must_use]
    pub fn watch_cooldown(&self) -> Option<watch::Receiver<u32>> {
        self.countdown.as_ref().map(Countdown::subscribe)
    }

    #[must_use]
    pub fn button_label(&self) -> String {
        match self.cooldown() {
            0 => "Send Reset Link".to_string(),
            seconds => format!("Redirecting in {seconds}s"),
        }
    }

    /// Sends the recovery email. On success the email locks and the redirect
    /// cooldown starts; on failure the form stays editable.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> Submission {
        if self.email_sent() {
            return Submission::Invalid;
        }
        if let Err(message) = check_email(&self.email) {
            self.message = Some(message);
            return Submission::Invalid;
        }
        self.message = None;

        match self
            .client
            .send_recovery(self.email.trim(), &self.redirect_to)
            .await
        {
            Ok(()) => {
                info!("recovery email requested");
                self.message = Some(Message::info(RESET_EMAIL_SENT));
                self.countdown = Some(redirect_after_cooldown(&self.navigator, Route::Login));
                Submission::Accepted
            }
            Err(err) => {
                debug!("recovery request rejected: {}", err);
                self.message = Some(Message::info(err.user_message()));
                Submission::Rejected
            }
        }
    }
}
