use crate::{
    auth::client::AuthClient,
    routes::{Message, Navigator, Route, Submission, check_email, check_password},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// `/login`: email and password sign-in.
pub struct LoginPage {
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    email: String,
    password: SecretString,
    message: Option<Message>,
}

impl LoginPage {
    pub fn new(client: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            client,
            navigator,
            email: String::new(),
            password: SecretString::default(),
            message: None,
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::from(password.into());
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

    /// Signs in. A rejected attempt shows the provider's text and clears both
    /// fields; success moves to the ticket list.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> Submission {
        if let Err(message) = check_email(&self.email)
            .and_then(|()| check_password(self.password.expose_secret()))
        {
            self.message = Some(message);
            return Submission::Invalid;
        }
        self.message = None;

        match self.client.sign_in(self.email.trim(), &self.password).await {
            Ok(_) => {
                info!("signed in");
                self.navigator.navigate(Route::Tickets);
                Submission::Accepted
            }
            Err(err) => {
                debug!("sign in rejected: {}", err);
                self.message = Some(Message::error(err.user_message()));
                self.email.clear();
                self.password = SecretString::default();
                Submission::Rejected
            }
        }
    }
}
