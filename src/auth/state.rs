//! Auth state shared by every screen. `AuthProvider` is mounted once at
//! startup: it subscribes to the client's change events, then resolves the
//! current user in the background. Consumers hold `AuthContext` handles that
//! read the state through a `watch` channel; only the provider task writes it.
//! Dropping the provider aborts the task and releases the subscription.

use crate::{
    auth::{
        client::AuthClient,
        types::{AuthChange, User},
    },
    errors::AppError,
};
use std::sync::Arc;
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        watch,
    },
    task::JoinHandle,
};
use tracing::{debug, error, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// The initial user query has not answered yet.
    Resolving,
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    fn from_change(change: &AuthChange) -> Self {
        match change.user() {
            Some(user) => AuthState::Authenticated(user.clone()),
            None => AuthState::Unauthenticated,
        }
    }

    fn from_user(user: Option<User>) -> Self {
        user.map_or(AuthState::Unauthenticated, AuthState::Authenticated)
    }
}

/// Owner of the auth state and of the task that keeps it current.
#[derive(Debug)]
pub struct AuthProvider {
    state: watch::Receiver<AuthState>,
    task: JoinHandle<()>,
}

impl AuthProvider {
    /// Starts tracking the client's auth state. Must be called inside a Tokio
    /// runtime.
    pub fn mount(client: Arc<dyn AuthClient>) -> Self {
        // Subscribe before querying so no change between the two is missed.
        let events = client.subscribe();
        let (tx, state) = watch::channel(AuthState::Resolving);
        let task = tokio::spawn(track(client, events, tx));
        Self { state, task }
    }

    #[must_use]
    pub fn context(&self) -> AuthContext {
        AuthContext {
            state: self.state.clone(),
        }
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn track(
    client: Arc<dyn AuthClient>,
    mut events: broadcast::Receiver<AuthChange>,
    state: watch::Sender<AuthState>,
) {
    let initial = async move { client.get_user().await };
    tokio::pin!(initial);
    let mut initial_pending = true;

    loop {
        tokio::select! {
            biased;
            change = events.recv() => match change {
                Ok(change) => {
                    debug!(event = ?change.event, "auth state change");
                    state.send_replace(AuthState::from_change(&change));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "auth events lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("auth event stream closed");
                    if initial_pending {
                        apply_initial(&state, initial.as_mut().await);
                    }
                    return;
                }
            },
            result = &mut initial, if initial_pending => {
                initial_pending = false;
                apply_initial(&state, result);
            }
        }
    }
}

/// Applies the initial query only while nothing newer has been seen.
fn apply_initial(
    state: &watch::Sender<AuthState>,
    result: Result<Option<User>, AppError>,
) {
    let next = match result {
        Ok(user) => AuthState::from_user(user),
        Err(err) => {
            error!("Failed to load current user: {}", err);
            AuthState::Unauthenticated
        }
    };
    state.send_if_modified(|current| {
        if *current == AuthState::Resolving {
            *current = next;
            true
        } else {
            false
        }
    });
}

/// Read-only handle to the auth state.
#[derive(Clone, Debug)]
pub struct AuthContext {
    state: watch::Receiver<AuthState>,
}

impl AuthContext {
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::Authenticated(_))
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::Resolving)
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        match &*self.state.borrow() {
            AuthState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Waits for the next state change. Returns `None` once the provider is
    /// gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Waits until the state leaves `Resolving`. A provider dropped before
    /// resolving counts as signed out.
    pub async fn resolved(&mut self) -> AuthState {
        match self
            .state
            .wait_for(|state| *state != AuthState::Resolving)
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => AuthState::Unauthenticated,
        }
    }

    /// Waits until a user is signed in. Returns `None` if the provider goes
    /// away first.
    pub async fn signed_in(&mut self) -> Option<User> {
        let state = self
            .state
            .wait_for(|state| matches!(state, AuthState::Authenticated(_)))
            .await
            .ok()?;
        match &*state {
            AuthState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::types::AuthEvent, testing::FakeAuthClient};
    use std::time::Duration;
    use tokio::time::sleep;

    fn mount(client: &Arc<FakeAuthClient>) -> AuthProvider {
        AuthProvider::mount(Arc::clone(client) as Arc<dyn AuthClient>)
    }

    #[tokio::test]
    async fn resolves_to_signed_in_user() {
        let client = Arc::new(FakeAuthClient::new());
        client.set_session(Some(FakeAuthClient::session_for("ana@example.com")));

        let provider = mount(&client);
        let mut auth = provider.context();

        assert_eq!(
            auth.resolved().await,
            AuthState::Authenticated(FakeAuthClient::user_for("ana@example.com"))
        );
        assert!(auth.is_authenticated());
        assert_eq!(
            auth.user().map(|u| u.id),
            Some("id-ana@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn resolves_to_unauthenticated_without_session() {
        let client = Arc::new(FakeAuthClient::new());
        let provider = mount(&client);
        let mut auth = provider.context();

        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn failed_initial_query_counts_as_signed_out() {
        let client = Arc::new(FakeAuthClient::new());
        client.fail_get_user(AppError::Network("offline".to_string()));

        let provider = mount(&client);
        let mut auth = provider.context();

        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_resolving_until_initial_query_answers() {
        let client = Arc::new(FakeAuthClient::new());
        let gate = client.hold_get_user();

        let provider = mount(&client);
        let mut auth = provider.context();
        sleep(Duration::from_millis(50)).await;
        assert!(auth.is_resolving());

        gate.notify_one();
        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn event_wins_over_stale_initial_query() {
        let client = Arc::new(FakeAuthClient::new());
        let gate = client.hold_get_user();
        let provider = mount(&client);
        let auth = provider.context();

        client.emit(AuthEvent::SignedOut, None);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(auth.state(), AuthState::Unauthenticated);

        // The held query now answers with a user, but the event is newer.
        client.set_session(Some(FakeAuthClient::session_for("ana@example.com")));
        gate.notify_one();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(auth.state(), AuthState::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn applies_events_in_emission_order() {
        let client = Arc::new(FakeAuthClient::new());
        let provider = mount(&client);
        let mut auth = provider.context();
        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);

        let ana = FakeAuthClient::session_for("ana@example.com");
        let bob = FakeAuthClient::session_for("bob@example.com");
        client.emit(AuthEvent::SignedIn, Some(ana.clone()));
        client.emit(AuthEvent::TokenRefreshed, Some(ana));
        client.emit(AuthEvent::SignedOut, None);
        client.emit(AuthEvent::SignedIn, Some(bob));
        sleep(Duration::from_millis(50)).await;

        assert_eq!(
            auth.state(),
            AuthState::Authenticated(FakeAuthClient::user_for("bob@example.com"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn changed_reports_each_transition() {
        let client = Arc::new(FakeAuthClient::new());
        let provider = mount(&client);
        let mut auth = provider.context();
        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);

        client.emit(
            AuthEvent::SignedIn,
            Some(FakeAuthClient::session_for("ana@example.com")),
        );
        assert_eq!(
            auth.changed().await,
            Some(AuthState::Authenticated(FakeAuthClient::user_for(
                "ana@example.com"
            )))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn signed_in_waits_for_a_user() {
        let client = Arc::new(FakeAuthClient::new());
        let provider = mount(&client);
        let mut auth = provider.context();
        assert_eq!(auth.resolved().await, AuthState::Unauthenticated);

        let waiter = {
            let mut auth = auth.clone();
            tokio::spawn(async move { auth.signed_in().await })
        };
        sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        client.emit(
            AuthEvent::SignedIn,
            Some(FakeAuthClient::session_for("bob@example.com")),
        );
        assert_eq!(
            waiter.await.ok().flatten().map(|u| u.id),
            Some("id-bob@example.com".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn drop_releases_subscription() {
        let client = Arc::new(FakeAuthClient::new());
        let provider = mount(&client);
        let mut auth = provider.context();
        auth.resolved().await;
        assert_eq!(client.subscriber_count(), 1);

        drop(provider);
        sleep(Duration::from_millis(50)).await;

        assert_eq!(client.subscriber_count(), 0);
        assert_eq!(auth.changed().await, None);
    }
}
