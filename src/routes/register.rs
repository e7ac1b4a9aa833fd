use crate::{
    auth::client::AuthClient,
    routes::{Message, Navigator, Route, Submission, check_email, check_password},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const CONFIRMATION_SENT: &str =
    "Registration successful! Please check your inbox to confirm your account";

/// `/register`: creates an account.
pub struct RegisterPage {
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    email: String,
    password: SecretString,
    message: Option<Message>,
    locked: bool,
}

impl RegisterPage {
    pub fn new(client: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            client,
            navigator,
            email: String::new(),
            password: SecretString::default(),
            message: None,
            locked: false,
        }
    }

    /// Ignored once the form is locked.
    pub fn set_email(&mut self, email: impl Into<String>) {
        if !self.locked {
            self.email = email.into();
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        if !self.locked {
            self.password = SecretString::from(password.into());
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
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
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Registers the account. With an immediate session the user lands on the
    /// ticket list; when the provider wants email confirmation first the form
    /// locks behind a confirmation message.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> Submission {
        if self.locked {
            return Submission::Invalid;
        }
        if let Err(message) = check_email(&self.email)
            .and_then(|()| check_password(self.password.expose_secret()))
        {
            self.message = Some(message);
            return Submission::Invalid;
        }
        self.message = None;

        match self.client.sign_up(self.email.trim(), &self.password).await {
            Ok(Some(_)) => {
                info!("registered and signed in");
                self.password = SecretString::default();
                self.navigator.navigate(Route::Tickets);
                Submission::Accepted
            }
            Ok(None) => {
                info!("registered, waiting for email confirmation");
                self.password = SecretString::default();
                self.locked = true;
                self.message = Some(Message::success(CONFIRMATION_SENT));
                Submission::Accepted
            }
            Err(err) => {
                debug!("registration rejected: {}", err);
                self.message = Some(Message::error(err.user_message()));
                self.password = SecretString::default();
                Submission::Rejected
            }
        }
    }
}
