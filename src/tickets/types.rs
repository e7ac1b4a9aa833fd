use serde::Deserialize;
use serde_json::Value;

/// Shown for tickets whose subject is missing or empty.
pub const NO_SUBJECT: &str = "No subject";

/// A row of the `tickets` table. Only the columns the list shows are decoded.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Ticket {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl Ticket {
    /// Line shown in the ticket list.
    #[must_use]
    pub fn display_subject(&self) -> &str {
        match self.subject.as_deref() {
            Some(subject) if !subject.is_empty() => subject,
            _ => NO_SUBJECT,
        }
    }
}
