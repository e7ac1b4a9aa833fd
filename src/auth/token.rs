use crate::auth::client::AuthClient;
use secrecy::SecretString;
use tracing::error;

/// Bearer token of the cached session, or `None` when there is no usable
/// session. Errors are logged and swallowed; callers decide what a missing
/// token means.
pub async fn session_token(client: &dyn AuthClient) -> Option<SecretString> {
    match client.get_session().await {
        Ok(Some(session)) => Some(session.access_token),
        Ok(None) => {
            error!("Session error: no active session");
            None
        }
        Err(err) => {
            error!("Session error: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::testing::FakeAuthClient;
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn returns_access_token_of_cached_session() {
        let client = FakeAuthClient::new();
        client.set_session(Some(FakeAuthClient::session_for("ana@example.com")));

        let token = session_token(&client).await;

        assert_eq!(
            token.map(|t| t.expose_secret().to_string()),
            Some("token-ana@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn returns_none_without_session() {
        let client = FakeAuthClient::new();
        assert!(session_token(&client).await.is_none());
    }

    #[tokio::test]
    async fn returns_none_when_provider_errors() {
        let client = FakeAuthClient::new();
        client.fail_get_session(AppError::Network("offline".to_string()));
        assert!(session_token(&client).await.is_none());
    }
}
