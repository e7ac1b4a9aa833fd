use crate::cli::actions::{
    Action,
    recovery::{ForgotArgs, ResetArgs},
    session::Credentials,
};
use crate::cli::commands::{screens, service};
use crate::config::{AppConfig, RuntimeConfig, apply_runtime_overrides, normalize_runtime_value};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;

/// Service config: build-time values, then environment, then flags.
fn config(matches: &clap::ArgMatches) -> AppConfig {
    let value = |id: &str| {
        matches
            .get_one::<String>(id)
            .and_then(|value| normalize_runtime_value(value))
    };

    let mut config = AppConfig::load();
    apply_runtime_overrides(
        &mut config,
        RuntimeConfig {
            api_base_url: value(service::ARG_API_URL),
            anon_key: value(service::ARG_ANON_KEY),
            site_url: value(service::ARG_SITE_URL),
        },
    );
    config
}

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn credentials(matches: &clap::ArgMatches, config: AppConfig) -> Result<Credentials> {
    Ok(Credentials {
        config,
        email: required(matches, screens::ARG_EMAIL)?,
        password: SecretString::from(required(matches, screens::ARG_PASSWORD)?),
    })
}

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let config = config(matches);

    match matches.subcommand() {
        Some((screens::CMD_REGISTER, sub)) => Ok(Action::Register(credentials(sub, config)?)),
        Some((screens::CMD_LOGIN, sub)) => Ok(Action::Login(credentials(sub, config)?)),
        Some((screens::CMD_TICKETS, sub)) => Ok(Action::Tickets(credentials(sub, config)?)),
        Some((screens::CMD_DASHBOARD, sub)) => Ok(Action::Dashboard(credentials(sub, config)?)),
        Some((screens::CMD_FORGOT_PASSWORD, sub)) => Ok(Action::ForgotPassword(ForgotArgs {
            config,
            email: required(sub, screens::ARG_EMAIL)?,
        })),
        Some((screens::CMD_RESET_PASSWORD, sub)) => Ok(Action::ResetPassword(ResetArgs {
            config,
            link: SecretString::from(required(sub, screens::ARG_LINK)?),
            new_password: SecretString::from(required(sub, screens::ARG_NEW_PASSWORD)?),
        })),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => Ok(Action::Home(config)),
    }
}
