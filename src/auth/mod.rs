//! Authentication against the hosted GoTrue API: the client seam and its HTTP
//! implementation, the shared auth state, the protected-screen gate, recovery
//! links and the session token accessor.

pub mod client;
pub mod gotrue;
pub mod guards;
pub mod recovery;
pub mod state;
pub mod token;
pub mod types;

pub use client::AuthClient;
pub use gotrue::GoTrueClient;
pub use guards::{GateDecision, RequireAuth};
pub use state::{AuthContext, AuthProvider, AuthState};
pub use token::session_token;
pub use types::{AuthChange, AuthEvent, Session, User};
