//! In-memory fakes for the auth client and navigator, shared by unit tests.

use crate::{
    auth::{
        client::AuthClient,
        types::{AuthChange, AuthEvent, Session, User, unix_now},
    },
    errors::AppError,
    routes::{Navigator, Route},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, broadcast};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    GetUser,
    GetSession,
    SignIn { email: String, password: String },
    SignUp { email: String },
    SendRecovery { email: String, redirect_to: String },
    UpdatePassword { password: String },
    RecoverSession,
}

#[derive(Default)]
struct FakeState {
    session: Option<Session>,
    calls: Vec<Call>,
    get_user_error: Option<AppError>,
    get_session_error: Option<AppError>,
    sign_in_error: Option<AppError>,
    sign_up_error: Option<AppError>,
    sign_up_requires_confirmation: bool,
    recovery_error: Option<AppError>,
    update_error: Option<AppError>,
    get_user_gate: Option<Arc<Notify>>,
}

pub(crate) struct FakeAuthClient {
    state: Mutex<FakeState>,
    events: broadcast::Sender<AuthChange>,
}

impl FakeAuthClient {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(FakeState::default()),
            events,
        }
    }

    pub(crate) fn user_for(email: &str) -> User {
        User {
            id: format!("id-{email}"),
            email: Some(email.to_string()),
            created_at: None,
            email_confirmed_at: None,
        }
    }

    pub(crate) fn session_for(email: &str) -> Session {
        Session {
            access_token: SecretString::from(format!("token-{email}")),
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: unix_now() + 3600,
            user: Some(Self::user_for(email)),
        }
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        self.state.lock().unwrap().session = session;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn fail_get_user(&self, err: AppError) {
        self.state.lock().unwrap().get_user_error = Some(err);
    }

    pub(crate) fn fail_get_session(&self, err: AppError) {
        self.state.lock().unwrap().get_session_error = Some(err);
    }

    pub(crate) fn fail_sign_in(&self, err: AppError) {
        self.state.lock().unwrap().sign_in_error = Some(err);
    }

    pub(crate) fn fail_sign_up(&self, err: AppError) {
        self.state.lock().unwrap().sign_up_error = Some(err);
    }

    pub(crate) fn require_confirmation(&self) {
        self.state.lock().unwrap().sign_up_requires_confirmation = true;
    }

    pub(crate) fn fail_recovery(&self, err: AppError) {
        self.state.lock().unwrap().recovery_error = Some(err);
    }

    pub(crate) fn fail_update(&self, err: AppError) {
        self.state.lock().unwrap().update_error = Some(err);
    }

    /// Holds `get_user` until the returned handle is notified.
    pub(crate) fn hold_get_user(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().get_user_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Emits an auth change as the provider would, updating the cached session.
    pub(crate) fn emit(&self, event: AuthEvent, session: Option<Session>) {
        self.state.lock().unwrap().session.clone_from(&session);
        let _ = self.events.send(AuthChange { event, session });
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl AuthClient for FakeAuthClient {
    async fn get_user(&self) -> Result<Option<User>, AppError> {
        self.record(Call::GetUser);
        let gate = self.state.lock().unwrap().get_user_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let state = self.state.lock().unwrap();
        if let Some(err) = state.get_user_error.clone() {
            return Err(err);
        }
        Ok(state.session.as_ref().and_then(|s| s.user.clone()))
    }

    async fn get_session(&self) -> Result<Option<Session>, AppError> {
        self.record(Call::GetSession);
        let state = self.state.lock().unwrap();
        if let Some(err) = state.get_session_error.clone() {
            return Err(err);
        }
        Ok(state.session.clone())
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AppError> {
        self.record(Call::SignIn {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        });
        let error = self.state.lock().unwrap().sign_in_error.clone();
        if let Some(err) = error {
            return Err(err);
        }
        let session = Self::session_for(email);
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &SecretString,
    ) -> Result<Option<Session>, AppError> {
        self.record(Call::SignUp {
            email: email.to_string(),
        });
        let (error, confirm) = {
            let state = self.state.lock().unwrap();
            (
                state.sign_up_error.clone(),
                state.sign_up_requires_confirmation,
            )
        };
        if let Some(err) = error {
            return Err(err);
        }
        if confirm {
            return Ok(None);
        }
        let session = Self::session_for(email);
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(Some(session))
    }

    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        self.record(Call::SendRecovery {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        });
        match self.state.lock().unwrap().recovery_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn update_password(&self, password: &SecretString) -> Result<User, AppError> {
        self.record(Call::UpdatePassword {
            password: password.expose_secret().to_string(),
        });
        let (error, session) = {
            let state = self.state.lock().unwrap();
            (state.update_error.clone(), state.session.clone())
        };
        if let Some(err) = error {
            return Err(err);
        }
        let Some(session) = session else {
            return Err(AppError::Provider("Auth session missing!".to_string()));
        };
        let user = session
            .user
            .clone()
            .unwrap_or_else(|| Self::user_for("unknown@example.com"));
        self.emit(AuthEvent::UserUpdated, Some(session));
        Ok(user)
    }

    async fn recover_session(&self, mut session: Session) -> Result<Session, AppError> {
        self.record(Call::RecoverSession);
        if session.user.is_none() {
            session.user = Some(Self::user_for("recovered@example.com"));
        }
        self.emit(AuthEvent::PasswordRecovery, Some(session.clone()));
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

/// Navigator that records every navigation in order.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
