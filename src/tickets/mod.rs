//! Ticket data from the hosted REST endpoint (`/rest/v1/tickets`).

mod client;
mod types;

pub use client::fetch_tickets;
pub use types::{NO_SUBJECT, Ticket};
