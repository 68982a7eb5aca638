//! Login, registration and logout.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{AuthApi, LoginRequest, RegisterRequest};
use crate::error::AuthError;
use crate::navigation::{Navigator, Route};
use crate::notify::{Notice, Notifier};
use crate::session::Session;

pub struct Auth {
    api: Arc<dyn AuthApi>,
    session: Session,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl Auth {
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: Session,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            notifier,
        }
    }

    /// Exchange credentials for a token and open the board.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.require("email", email)?;
        self.require("password", password)?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(email, "login failed: {}", err);
                self.notifier
                    .notify(Notice::error("Login failed. Check your credentials."));
                return Err(AuthError::Login(err));
            }
        };

        self.session.set_token(response.access_token)?;
        info!(email, "logged in");
        self.navigator.navigate(Route::Board);
        Ok(())
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        firstname: &str,
        lastname: &str,
    ) -> Result<(), AuthError> {
        self.require("first name", firstname)?;
        self.require("last name", lastname)?;
        self.require("email", email)?;
        self.require("password", password)?;

        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        };
        if let Err(err) = self.api.register(&request).await {
            warn!(email, "registration failed: {}", err);
            self.notifier
                .notify(Notice::error("Registration failed. Try again."));
            return Err(AuthError::Register(err));
        }

        info!(email, "registered");
        self.notifier
            .notify(Notice::success("Registration successful! Please log in."));
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    pub fn logout(&self) {
        self.session.clear();
        info!("logged out");
        self.navigator.navigate(Route::Login);
    }

    /// Blank fields never reach the API; the user is told which one is missing.
    fn require(&self, field: &'static str, value: &str) -> Result<(), AuthError> {
        if value.trim().is_empty() {
            let err = AuthError::MissingField(field);
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err);
        }
        Ok(())
    }
}
