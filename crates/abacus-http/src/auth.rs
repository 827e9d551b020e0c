//! Login, signup and logout.

use tracing::{debug, info, instrument, warn};

use abacus_core::error::AuthError;
use abacus_core::{
    AccessToken, CredentialRecord, Credentials, RefreshToken, Result, TerminationReason,
};

use crate::client::ApiClient;
use crate::endpoints::{AuthRequest, AuthResponse, LOGIN, LOGOUT, SIGNUP};
use crate::request::ApiRequest;

/// The three operations that change who is signed in.
#[derive(Debug, Clone)]
pub struct AuthFacade {
    client: ApiClient,
}

impl AuthFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in and persist the returned credentials.
    ///
    /// Any failure is reported as [`AuthError::LoginFailed`]; the underlying
    /// cause is only logged.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        match self.authenticate(LOGIN, credentials).await {
            Ok(record) => {
                info!(username = %record.username(), "Logged in");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                Err(AuthError::LoginFailed.into())
            }
        }
    }

    /// Create an account and persist the returned credentials.
    ///
    /// Any failure is reported as [`AuthError::SignupFailed`]; the underlying
    /// cause is only logged.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn signup(&self, credentials: &Credentials) -> Result<()> {
        match self.authenticate(SIGNUP, credentials).await {
            Ok(record) => {
                info!(username = %record.username(), "Signed up");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Signup failed");
                Err(AuthError::SignupFailed.into())
            }
        }
    }

    /// End the session.
    ///
    /// Tells the server (best effort, outcome ignored), then clears the store,
    /// resets the session state and asks the host to return to the login
    /// entry point. The local steps always run; an error is returned only if
    /// the store could not be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if self.client.state().is_authenticated() {
            match self.client.send_once(ApiRequest::post(LOGOUT)).await {
                Ok(_) => debug!("Server acknowledged logout"),
                Err(err) => warn!(error = %err, "Server logout failed, clearing local session anyway"),
            }
        }

        let cleared = self.client.store().clear();
        self.client.state().sign_out();
        self.client.host().terminate_session(TerminationReason::LoggedOut);

        info!("Logged out");
        cleared
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<CredentialRecord> {
        let body = AuthRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: AuthResponse = self
            .client
            .send_public(ApiRequest::post(path).json(&body)?)
            .await?
            .json()?;

        let record = CredentialRecord::new(
            AccessToken::new(response.token),
            RefreshToken::new(response.refresh_token),
            response.username,
        );

        // Later calls pick the token up from the store
        self.client.store().save(&record)?;
        self.client.state().sign_in(record.username());

        Ok(record)
    }
}
