use crate::{
    auth::state::{AuthContext, AuthState},
    routes::{Navigator, Route},
};
use tracing::info;

/// What a gated screen should do for the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// State not known yet; render nothing and do not redirect.
    Pending,
    Render,
    Redirect(Route),
}

/// Gate for screens that need a signed-in user. UX only; the data endpoint
/// enforces real access control.
pub struct RequireAuth;

impl RequireAuth {
    #[must_use]
    pub fn check(auth: &AuthContext) -> GateDecision {
        match auth.state() {
            AuthState::Resolving => GateDecision::Pending,
            AuthState::Authenticated(_) => GateDecision::Render,
            AuthState::Unauthenticated => GateDecision::Redirect(Route::Login),
        }
    }

    /// Waits for the auth state to resolve, redirecting to login when nobody is
    /// signed in. Returns whether the gated screen may render.
    pub async fn enter(auth: &AuthContext, navigator: &dyn Navigator) -> bool {
        let mut auth = auth.clone();
        match auth.resolved().await {
            AuthState::Authenticated(_) => true,
            _ => {
                info!("not signed in, redirecting to {}", Route::Login);
                navigator.navigate(Route::Login);
                false
            }
        }
    }
}
