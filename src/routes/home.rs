use crate::routes::Route;

/// `/`: entry screen linking to the public flows.
#[derive(Clone, Copy, Debug, Default)]
pub struct HomePage;

impl HomePage {
    #[must_use]
    pub fn links(self) -> [(&'static str, Route); 3] {
        [
            ("Register", Route::Register),
            ("Login", Route::Login),
            ("Forgot password?", Route::ForgotPassword),
        ]
    }
}
