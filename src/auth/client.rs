//! The narrow auth-provider surface the app consumes. Screens, the auth state
//! publisher and the token accessor only see this trait, so they run the same
//! against the hosted GoTrue API and against in-memory fakes.

use crate::{
    auth::types::{AuthChange, Session, User},
    errors::AppError,
};
use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::broadcast;

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Current user of the cached session, `None` when signed out.
    async fn get_user(&self) -> Result<Option<User>, AppError>;

    /// Cached session, refreshed first when it has expired.
    async fn get_session(&self) -> Result<Option<Session>, AppError>;

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AppError>;

    /// Registers a user. Returns `None` when the provider requires email
    /// confirmation before issuing a session.
    async fn sign_up(&self, email: &str, password: &SecretString)
    -> Result<Option<Session>, AppError>;

    /// Sends a password-recovery email whose link lands on `redirect_to`.
    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), AppError>;

    /// Changes the password of the user owning the cached session.
    async fn update_password(&self, password: &SecretString) -> Result<User, AppError>;

    /// Installs a session obtained from a password-recovery link.
    async fn recover_session(&self, session: Session) -> Result<Session, AppError>;

    /// Subscribes to auth-change events. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
