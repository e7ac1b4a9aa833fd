use crate::{
    auth::{client::AuthClient, recovery::parse_recovery_fragment},
    countdown::Countdown,
    routes::{Message, Navigator, Route, Submission, check_password, redirect_after_cooldown},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

pub const PASSWORD_UPDATED: &str = "Password updated successfully!";

/// `/reset-password`: sets a new password for the session opened by a
/// recovery link, then returns to login after a cooldown.
pub struct ResetPasswordPage {
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    password: SecretString,
    message: Option<Message>,
    countdown: Option<Countdown>,
}

impl ResetPasswordPage {
    pub fn new(client: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            client,
            navigator,
            password: SecretString::default(),
            message: None,
            countdown: None,
        }
    }

    /// Installs the session carried by a recovery link. Returns `false` and
    /// shows the reason when the link is unusable.
    #[instrument(skip_all)]
    pub async fn open_recovery_link(&mut self, link: &str) -> bool {
        let recovered = match parse_recovery_fragment(link) {
            Ok(session) => self.client.recover_session(session).await,
            Err(err) => Err(err),
        };
        match recovered {
            Ok(_) => {
                info!("recovery session installed");
                true
            }
            Err(err) => {
                debug!("recovery link rejected: {}", err);
                self.message = Some(Message::error(err.user_message()));
                false
            }
        }
    }

    /// Ignored once the password has been updated.
    pub fn set_password(&mut self, password: impl Into<String>) {
        if !self.succeeded() {
            self.password = SecretString::from(password.into());
        }
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.countdown.is_some()
    }

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
        if self.succeeded() {
            format!("Redirecting in {}s", self.cooldown())
        } else {
            "Update Password".to_string()
        }
    }

    /// Updates the password. On success the field locks and the redirect
    /// cooldown starts; on failure the form stays editable.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> Submission {
        if self.succeeded() {
            return Submission::Invalid;
        }
        if let Err(message) = check_password(self.password.expose_secret()) {
            self.message = Some(message);
            return Submission::Invalid;
        }
        self.message = None;

        match self.client.update_password(&self.password).await {
            Ok(_) => {
                info!("password updated");
                self.password = SecretString::default();
                self.message = Some(Message::success(PASSWORD_UPDATED));
                self.countdown = Some(redirect_after_cooldown(&self.navigator, Route::Login));
                Submission::Accepted
            }
            Err(err) => {
                debug!("password update rejected: {}", err);
                self.message = Some(Message::error(err.user_message()));
                Submission::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        routes::{MessageKind, REDIRECT_COOLDOWN_SECONDS},
        testing::{Call, FakeAuthClient, RecordingNavigator},
    };
    use std::time::Duration;
    use tokio::time::sleep;

    fn page(client: &Arc<FakeAuthClient>, navigator: &Arc<RecordingNavigator>) -> ResetPasswordPage {
        ResetPasswordPage::new(
            Arc::clone(client) as Arc<dyn AuthClient>,
            Arc::clone(navigator) as Arc<dyn Navigator>,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn recovery_link_then_update_redirects_after_cooldown() {
        let client = Arc::new(FakeAuthClient::new());
        let navigator = RecordingNavigator::new();
        let mut reset = page(&client, &navigator);

        assert!(
            reset
                .open_recovery_link(
                    "http://localhost:5173/reset-password#access_token=tok&type=recovery"
                )
                .await
        );
        reset.set_password("n3w-password");
        assert_eq!(reset.button_label(), "Update Password");

        assert_eq!(reset.submit().await, Submission::Accepted);

        assert_eq!(
            client.calls(),
            vec![
                Call::RecoverSession,
                Call::UpdatePassword {
                    password: "n3w-password".to_string(),
                },
            ]
        );
        assert_eq!(reset.message(), Some(&Message::success(PASSWORD_UPDATED)));
        assert!(!reset.has_password());
        assert_eq!(reset.cooldown(), REDIRECT_COOLDOWN_SECONDS);
        assert_eq!(reset.button_label(), "Redirecting in 8s");

        sleep(Duration::from_millis(7500)).await;
        assert_eq!(reset.cooldown(), 1);
        assert!(navigator.routes().is_empty());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(navigator.routes(), vec![Route::Login]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_styled_as_error_and_never_redirects() {
        let client = Arc::new(FakeAuthClient::new());
        client.fail_update(AppError::Provider(
            "New password should be different from the old password.".to_string(),
        ));
        let navigator = RecordingNavigator::new();
        let mut reset = page(&client, &navigator);
        reset.set_password("same-old");

        assert_eq!(reset.submit().await, Submission::Rejected);

        assert_eq!(reset.message().map(|m| m.kind), Some(MessageKind::Error));
        assert!(!reset.succeeded());
        assert!(reset.has_password());
        assert_eq!(reset.cooldown(), 0);

        sleep(Duration::from_secs(20)).await;
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn update_without_session_surfaces_provider_text() {
        let client = Arc::new(FakeAuthClient::new());
        let navigator = RecordingNavigator::new();
        let mut reset = page(&client, &navigator);
        reset.set_password("n3w-password");

        assert_eq!(reset.submit().await, Submission::Rejected);
        assert_eq!(
            reset.message(),
            Some(&Message::error("Auth session missing!"))
        );
    }

    #[tokio::test]
    async fn expired_link_is_reported() {
        let client = Arc::new(FakeAuthClient::new());
        let navigator = RecordingNavigator::new();
        let mut reset = page(&client, &navigator);

        let opened = reset
            .open_recovery_link(
                "#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
            )
            .await;

        assert!(!opened);
        assert_eq!(
            reset.message(),
            Some(&Message::error("Email link is invalid or has expired"))
        );
        assert!(client.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_mid_cooldown_cancels_redirect() {
        let client = Arc::new(FakeAuthClient::new());
        client.set_session(Some(FakeAuthClient::session_for("ana@example.com")));
        let navigator = RecordingNavigator::new();
        let mut reset = page(&client, &navigator);
        reset.set_password("n3w-password");
        assert_eq!(reset.submit().await, Submission::Accepted);

        sleep(Duration::from_secs(2)).await;
        drop(reset);
        sleep(Duration::from_secs(20)).await;

        assert!(navigator.routes().is_empty());
    }
}
