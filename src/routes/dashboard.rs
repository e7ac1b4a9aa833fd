use crate::auth::{state::AuthContext, types::User};

/// `/dashboard`: landing screen for a signed-in user.
pub struct DashboardPage {
    auth: AuthContext,
}

impl DashboardPage {
    #[must_use]
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn greeting(&self) -> String {
        match self.auth.user() {
            Some(User {
                email: Some(email), ..
            }) => format!("Welcome, {email}"),
            Some(user) => format!("Welcome, {}", user.id),
            None => "Welcome".to_string(),
        }
    }
}
