use crate::{
    api::ApiClient,
    auth::{client::AuthClient, token::session_token},
    tickets::{Ticket, fetch_tickets},
};
use std::sync::Arc;
use tracing::{error, info};

/// `/tickets`: the signed-in user's tickets. Load failures are logged and show
/// as an empty list.
pub struct TicketsPage {
    client: Arc<dyn AuthClient>,
    api: ApiClient,
    tickets: Vec<Ticket>,
}

impl TicketsPage {
    pub fn new(client: Arc<dyn AuthClient>, api: ApiClient) -> Self {
        Self {
            client,
            api,
            tickets: Vec::new(),
        }
    }

    /// Fetches the list once. Never fails; any error leaves the list empty.
    pub async fn load(&mut self) -> &[Ticket] {
        let token = session_token(self.client.as_ref()).await;
        match fetch_tickets(&self.api, token.as_ref()).await {
            Ok(tickets) => {
                info!(count = tickets.len(), "tickets loaded");
                self.tickets = tickets;
            }
            Err(err) => {
                error!("Error fetching tickets: {}", err);
                self.tickets.clear();
            }
        }
        &self.tickets
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// One line per ticket, in response order.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.tickets.iter().map(Ticket::display_subject).collect()
    }
}
