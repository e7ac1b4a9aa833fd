use thiserror::Error;

/// Errors surfaced by the auth client, the data endpoint and the HTTP helpers.
///
/// `Provider` carries text reported by the hosted auth service; screens show it
/// verbatim, so its display is the bare message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Provider(String),
    #[error("No active session")]
    Unauthenticated,
}

impl AppError {
    /// Text shown to the user in a screen banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            AppError::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            AppError::Serialization(format!("Failed to build request: {err}"))
        } else {
            AppError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}
