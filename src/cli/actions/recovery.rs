use crate::{
    app::App,
    cli::actions::{failure, render_message},
    config::AppConfig,
    routes::{Route, Submission},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

#[derive(Debug)]
pub struct ForgotArgs {
    pub config: AppConfig,
    pub email: String,
}

#[derive(Debug)]
pub struct ResetArgs {
    pub config: AppConfig,
    pub link: SecretString,
    pub new_password: SecretString,
}

/// Prints each remaining second until the countdown ends, then where the app
/// went. The screen owning the countdown must stay alive meanwhile.
async fn follow_cooldown(app: &App, cooldown: Option<watch::Receiver<u32>>) {
    let Some(mut cooldown) = cooldown else {
        return;
    };
    let mut route = app.router().subscribe();

    println!("Redirecting in {}s", *cooldown.borrow_and_update());
    while cooldown.changed().await.is_ok() {
        let left = *cooldown.borrow_and_update();
        if left > 0 {
            println!("Redirecting in {left}s");
        }
    }
    if route.has_changed().unwrap_or(false) {
        println!("-> {}", *route.borrow_and_update());
    }
}

/// # Errors
/// Returns an error if the recovery request is rejected.
pub async fn forgot_password(args: ForgotArgs) -> Result<()> {
    let app = App::new(args.config)?;
    app.open(Route::ForgotPassword).await;

    let mut page = app.forgot_password();
    page.set_email(args.email);

    if page.submit().await != Submission::Accepted {
        return Err(failure(page.message(), "Password recovery failed"));
    }
    if let Some(message) = page.message() {
        println!("{}", render_message(message));
    }
    follow_cooldown(&app, page.watch_cooldown()).await;
    Ok(())
}

/// # Errors
/// Returns an error if the link is unusable or the update is rejected.
pub async fn reset_password(args: ResetArgs) -> Result<()> {
    let app = App::new(args.config)?;
    app.open(Route::ResetPassword).await;

    let mut page = app.reset_password();
    if !page.open_recovery_link(args.link.expose_secret()).await {
        return Err(failure(page.message(), "Password reset link is invalid"));
    }
    page.set_password(args.new_password.expose_secret());

    if page.submit().await != Submission::Accepted {
        return Err(failure(page.message(), "Password update failed"));
    }
    if let Some(message) = page.message() {
        println!("{}", render_message(message));
    }
    follow_cooldown(&app, page.watch_cooldown()).await;
    Ok(())
}
