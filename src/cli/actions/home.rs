use crate::{
    app::App,
    config::AppConfig,
    routes::{HomePage, Route},
};
use anyhow::Result;

/// One line per home link, naming the subcommand that opens the screen.
pub(crate) fn menu(page: HomePage) -> Vec<String> {
    page.links()
        .into_iter()
        .map(|(label, route)| {
            format!(
                "{label:<18}ticketdesk {}",
                route.path().trim_start_matches('/')
            )
        })
        .collect()
}

/// Shows the home screen when no subcommand is given.
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub async fn show(config: AppConfig) -> Result<()> {
    let app = App::new(config)?;
    let landed = app.open(Route::Home).await;

    println!("ticketdesk {landed}");
    for line in menu(app.home()) {
        println!("  {line}");
    }
    Ok(())
}
