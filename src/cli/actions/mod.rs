pub mod home;
pub mod recovery;
pub mod session;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    config::AppConfig,
    routes::{Message, MessageKind},
};

#[derive(Debug)]
pub enum Action {
    Home(AppConfig),
    Register(session::Credentials),
    Login(session::Credentials),
    Tickets(session::Credentials),
    Dashboard(session::Credentials),
    ForgotPassword(recovery::ForgotArgs),
    ResetPassword(recovery::ResetArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Error carrying the screen's banner text, or `fallback` without one.
pub(crate) fn failure(message: Option<&Message>, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(message.map_or_else(|| fallback.to_string(), |message| message.text.clone()))
}

/// Terminal rendering of a screen banner.
pub(crate) fn render_message(message: &Message) -> String {
    let tag = match message.kind {
        MessageKind::Info => "info",
        MessageKind::Success => "ok",
        MessageKind::Error => "error",
    };
    format!("[{tag}] {}", message.text)
}
