//! Composition root: one auth client, one auth state provider and one router
//! shared by every screen the app opens.

use crate::{
    api::ApiClient,
    auth::{
        client::AuthClient,
        gotrue::GoTrueClient,
        guards::RequireAuth,
        state::{AuthContext, AuthProvider},
    },
    config::AppConfig,
    errors::AppError,
    routes::{
        DashboardPage, ForgotPasswordPage, HomePage, LoginPage, Navigator, RegisterPage,
        ResetPasswordPage, Route, Router, TicketsPage,
    },
};
use std::sync::Arc;
use tracing::debug;

pub struct App {
    config: AppConfig,
    api: ApiClient,
    client: Arc<dyn AuthClient>,
    router: Arc<Router>,
    auth: AuthProvider,
}

impl App {
    /// Builds the app against the hosted service. Must be called inside a
    /// Tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let api = ApiClient::new(&config)?;
        let client: Arc<dyn AuthClient> = Arc::new(GoTrueClient::with_api(api.clone()));
        Ok(Self::with_client(config, api, client))
    }

    /// Same as `new` with an explicit auth client.
    pub fn with_client(config: AppConfig, api: ApiClient, client: Arc<dyn AuthClient>) -> Self {
        let auth = AuthProvider::mount(Arc::clone(&client));
        Self {
            config,
            api,
            client,
            router: Arc::new(Router::new(Route::Home)),
            auth,
        }
    }

    #[must_use]
    pub fn auth(&self) -> AuthContext {
        self.auth.context()
    }

    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.router) as Arc<dyn Navigator>
    }

    /// Navigates to `route`, applying the auth gate to protected screens.
    /// A gated route is published only once the auth state allows it.
    /// Returns the route the app ends up on.
    pub async fn open(&self, route: Route) -> Route {
        if route.is_gated() && !RequireAuth::enter(&self.auth(), self.router.as_ref()).await {
            debug!(%route, "gate refused");
        } else {
            self.router.navigate(route);
        }
        self.router.current()
    }

    #[must_use]
    pub fn home(&self) -> HomePage {
        HomePage
    }

    #[must_use]
    pub fn login(&self) -> LoginPage {
        LoginPage::new(Arc::clone(&self.client), self.navigator())
    }

    #[must_use]
    pub fn register(&self) -> RegisterPage {
        RegisterPage::new(Arc::clone(&self.client), self.navigator())
    }

    #[must_use]
    pub fn forgot_password(&self) -> ForgotPasswordPage {
        ForgotPasswordPage::new(
            Arc::clone(&self.client),
            self.navigator(),
            self.config.reset_password_url(),
        )
    }

    #[must_use]
    pub fn reset_password(&self) -> ResetPasswordPage {
        ResetPasswordPage::new(Arc::clone(&self.client), self.navigator())
    }

    #[must_use]
    pub fn tickets(&self) -> TicketsPage {
        TicketsPage::new(Arc::clone(&self.client), self.api.clone())
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage::new(self.auth())
    }
}
