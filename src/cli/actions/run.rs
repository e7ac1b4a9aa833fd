use crate::cli::actions::{Action, home, recovery, session};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Home(config) => home::show(config).await,
        Action::Register(args) => session::register(args).await,
        Action::Login(args) => session::login(args).await,
        Action::Tickets(args) => session::tickets(args).await,
        Action::Dashboard(args) => session::dashboard(args).await,
        Action::ForgotPassword(args) => recovery::forgot_password(args).await,
        Action::ResetPassword(args) => recovery::reset_password(args).await,
    }
}
