use crate::{
    app::App,
    cli::actions::{failure, render_message},
    config::AppConfig,
    routes::{Route, Submission},
};
use anyhow::{Context, Result, bail};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

/// How long to wait for the auth state to pick up a fresh sign-in.
const SIGN_IN_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Credentials {
    pub config: AppConfig,
    pub email: String,
    pub password: SecretString,
}

/// Waits until the auth state shows the freshly signed-in user.
async fn await_user(app: &App) -> Result<()> {
    let mut auth = app.auth();
    let user = tokio::time::timeout(SIGN_IN_WAIT, auth.signed_in())
        .await
        .ok()
        .flatten()
        .context("sign-in was not confirmed by the auth service")?;
    debug!(user = %user.id, "signed in");
    Ok(())
}

async fn sign_in(app: &App, args: &Credentials) -> Result<()> {
    let mut login = app.login();
    login.set_email(args.email.as_str());
    login.set_password(args.password.expose_secret());

    if login.submit().await != Submission::Accepted {
        return Err(failure(login.message(), "Sign in failed"));
    }
    await_user(app).await
}

async fn show_tickets(app: &App) -> Result<()> {
    if app.open(Route::Tickets).await != Route::Tickets {
        bail!("Not signed in");
    }

    let mut page = app.tickets();
    page.load().await;

    println!("Tickets");
    if page.tickets().is_empty() {
        println!("  (none)");
    }
    for line in page.lines() {
        println!("  - {line}");
    }
    Ok(())
}

/// # Errors
/// Returns an error if registration is rejected.
pub async fn register(args: Credentials) -> Result<()> {
    let app = App::new(args.config.clone())?;
    app.open(Route::Register).await;

    let mut page = app.register();
    page.set_email(args.email.as_str());
    page.set_password(args.password.expose_secret());

    if page.submit().await != Submission::Accepted {
        return Err(failure(page.message(), "Registration failed"));
    }
    if let Some(message) = page.message() {
        println!("{}", render_message(message));
    }
    if app.router().current() == Route::Tickets {
        await_user(&app).await?;
        show_tickets(&app).await?;
    }
    Ok(())
}

/// Signs in, then shows the screen login lands on.
/// # Errors
/// Returns an error if sign-in is rejected.
pub async fn login(args: Credentials) -> Result<()> {
    let app = App::new(args.config.clone())?;
    app.open(Route::Login).await;
    sign_in(&app, &args).await?;

    match app.router().current() {
        Route::Tickets => show_tickets(&app).await,
        other => {
            println!("-> {other}");
            Ok(())
        }
    }
}

/// # Errors
/// Returns an error if sign-in is rejected.
pub async fn tickets(args: Credentials) -> Result<()> {
    let app = App::new(args.config.clone())?;
    sign_in(&app, &args).await?;
    show_tickets(&app).await
}

/// # Errors
/// Returns an error if sign-in is rejected.
pub async fn dashboard(args: Credentials) -> Result<()> {
    let app = App::new(args.config.clone())?;
    sign_in(&app, &args).await?;

    if app.open(Route::Dashboard).await != Route::Dashboard {
        bail!("Not signed in");
    }
    let page = app.dashboard();
    println!("{}", page.greeting());
    println!("  tickets: {}", Route::Tickets);
    Ok(())
}
