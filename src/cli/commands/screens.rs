use clap::{Arg, Command};

pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGIN: &str = "login";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_TICKETS: &str = "tickets";
pub const CMD_DASHBOARD: &str = "dashboard";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NEW_PASSWORD: &str = "new-password";
pub const ARG_LINK: &str = "link";

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("TICKETDESK_EMAIL")
        .required(true)
}

fn password() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("TICKETDESK_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

/// One subcommand per screen of the app.
#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account")
                .arg(email())
                .arg(password()),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and list your tickets")
                .arg(email())
                .arg(password()),
        )
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Email a password recovery link")
                .arg(email()),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password from a recovery link")
                .arg(
                    Arg::new(ARG_LINK)
                        .short('l')
                        .long(ARG_LINK)
                        .help("Recovery link from the email, or just its #fragment")
                        .env("TICKETDESK_RECOVERY_LINK")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_NEW_PASSWORD)
                        .long(ARG_NEW_PASSWORD)
                        .help("New account password")
                        .env("TICKETDESK_NEW_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_TICKETS)
                .about("List your tickets")
                .arg(email())
                .arg(password()),
        )
        .subcommand(
            Command::new(CMD_DASHBOARD)
                .about("Show the signed-in dashboard")
                .arg(email())
                .arg(password()),
        )
}
