use crate::{
    api::{ApiClient, handle_json_response},
    errors::AppError,
    tickets::types::Ticket,
};
use reqwest::Method;
use secrecy::SecretString;
use tracing::{Instrument, info_span};

const TICKETS_PATH: &str = "/rest/v1/tickets";

/// Reads the `tickets` collection as the token's owner.
///
/// # Errors
/// `AppError::Unauthenticated` without a token (nothing is sent), `AppError::Http`
/// on a non-success status, and network or decode errors from the request.
pub async fn fetch_tickets(
    api: &ApiClient,
    token: Option<&SecretString>,
) -> Result<Vec<Ticket>, AppError> {
    let token = token.ok_or(AppError::Unauthenticated)?;
    let span = info_span!(
        "tickets.fetch",
        http.method = "GET",
        url.path = TICKETS_PATH
    );
    let response = api
        .authorized(Method::GET, TICKETS_PATH, token)
        .send()
        .instrument(span)
        .await?;

    handle_json_response(response).await
}
