//! Refresh-and-replay on authorization failure.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use abacus_core::error::{AuthError, Error, RefreshFailure};
use abacus_core::{AccessToken, CredentialStore, Result, SessionHost, TerminationReason};

use crate::endpoints::{REFRESH, RefreshResponse};
use crate::http::{ApiResponse, HttpClient};
use crate::request::ApiRequest;
use crate::state::AuthState;

/// How concurrent authorization failures share refresh work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Every failing call runs its own refresh.
    #[default]
    PerCall,
    /// Refreshes are serialized. A call that failed with a token someone else
    /// has since replaced skips its own refresh and replays with the new token.
    SingleFlight,
}

/// Handles the response side of every call.
///
/// Per call the flow is:
///
/// - response not 401/403: returned as is (2xx) or as an error carrying the
///   original status and body
/// - 401/403: one refresh call to `/refresh`, authenticated with the stored
///   refresh token rather than the access token
///     - refresh succeeds: the new access token is stored (refresh token and
///       username untouched), the original request gets the new bearer and is
///       sent exactly once more, and whatever the replay returns is final. A
///       second 401/403 is not refreshed again.
///     - no refresh token, or refresh fails for any reason: credentials are
///       cleared, the session state is reset, the host is told to terminate
///       the session and the call fails with [`AuthError::SessionEnded`]
///
/// In [`RefreshMode::SingleFlight`] the session is ended while the gate is
/// still held, and calls that were waiting on a failed refresh get the same
/// failure without ending the session again.
pub struct RefreshCoordinator {
    http: HttpClient,
    store: Arc<dyn CredentialStore>,
    state: AuthState,
    host: Arc<dyn SessionHost>,
    mode: RefreshMode,
    gate: Mutex<Option<SettledFailure>>,
}

/// The last refresh that failed under the single-flight gate.
struct SettledFailure {
    /// Access token the failing call had sent, if any.
    sent: Option<AccessToken>,
    failure: RefreshFailure,
}

impl SettledFailure {
    fn applies_to(&self, sent: Option<&str>) -> bool {
        self.sent.as_ref().map(AccessToken::as_str) == sent
    }
}

impl RefreshCoordinator {
    pub fn new(
        http: HttpClient,
        store: Arc<dyn CredentialStore>,
        state: AuthState,
        host: Arc<dyn SessionHost>,
        mode: RefreshMode,
    ) -> Self {
        Self {
            http,
            store,
            state,
            host,
            mode,
            gate: Mutex::new(None),
        }
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Inspect `response` to `request` and refresh and replay if needed.
    #[instrument(skip_all, fields(path = request.path(), status = %response.status()))]
    pub async fn handle(&self, mut request: ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
        if !response.is_auth_failure() {
            return response.into_result();
        }

        debug!("Authorization failed, refreshing access token");

        let token = self.renew(&request).await?;

        request.set_bearer(token.as_str())?;
        let replay = self.http.send(&request).await?;
        debug!(status = %replay.status(), "Replayed request");

        replay.into_result()
    }

    /// Obtain a fresh access token, or end the session.
    async fn renew(&self, request: &ApiRequest) -> Result<AccessToken> {
        match self.mode {
            RefreshMode::PerCall => self.refresh().await.map_err(|f| self.end_session(f)),
            RefreshMode::SingleFlight => {
                let mut settled = self.gate.lock().await;
                let sent = request.bearer_token();

                let current = match self.store.access_token() {
                    Ok(current) => current,
                    Err(err) => return Err(self.end_session(store_failure(err))),
                };

                match current {
                    Some(current) if sent != Some(current.as_str()) => {
                        debug!("Access token already refreshed by another call");
                        return Ok(current);
                    }
                    None => {
                        if let Some(previous) = settled.as_ref().filter(|s| s.applies_to(sent)) {
                            debug!("Refresh already failed for this session");
                            return Err(AuthError::SessionEnded(previous.failure.clone()).into());
                        }
                    }
                    Some(_) => {}
                }

                match self.refresh().await {
                    Ok(token) => {
                        *settled = None;
                        Ok(token)
                    }
                    Err(failure) => {
                        *settled = Some(SettledFailure {
                            sent: sent.map(AccessToken::new),
                            failure: failure.clone(),
                        });
                        Err(self.end_session(failure))
                    }
                }
            }
        }
    }

    async fn refresh(&self) -> std::result::Result<AccessToken, RefreshFailure> {
        let refresh_token = self
            .store
            .refresh_token()
            .map_err(store_failure)?
            .ok_or(RefreshFailure::Unavailable)?;

        let request = ApiRequest::post(REFRESH)
            .bearer(refresh_token.as_str())
            .map_err(store_failure)?;

        let response = self
            .http
            .send(&request)
            .await
            .map_err(|e| RefreshFailure::Transport {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RefreshFailure::Rejected {
                status: response.status().as_u16(),
            });
        }

        let body: RefreshResponse =
            response
                .json()
                .map_err(|e| RefreshFailure::InvalidResponse {
                    message: e.to_string(),
                })?;

        let token = AccessToken::new(body.token);
        match self.store.replace_access_token(token.clone()) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(RefreshFailure::Cleared),
            Err(err) => return Err(store_failure(err)),
        }

        info!("Access token refreshed");
        Ok(token)
    }

    fn end_session(&self, failure: RefreshFailure) -> Error {
        if failure == RefreshFailure::Cleared {
            // Whoever cleared the store already ended the session
            debug!("Session cleared while refreshing, not replaying");
            return AuthError::SessionEnded(failure).into();
        }

        warn!(%failure, "Token refresh failed, ending session");

        if let Err(err) = self.store.clear() {
            warn!(error = %err, "Failed to clear credential store");
        }
        self.state.sign_out();
        self.host.terminate_session(TerminationReason::RefreshFailed);

        AuthError::SessionEnded(failure).into()
    }
}

fn store_failure(err: Error) -> RefreshFailure {
    RefreshFailure::Store {
        message: err.to_string(),
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("base", self.http.base())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
