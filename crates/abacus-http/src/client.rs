//! The authenticated request pipeline.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use abacus_core::{CredentialStore, Result, SessionHost};

use crate::http::{ApiResponse, HttpClient};
use crate::interceptor::RequestInterceptor;
use crate::refresh::{RefreshCoordinator, RefreshMode};
use crate::request::ApiRequest;
use crate::state::AuthState;

/// Entry point for every authenticated API call.
///
/// Clones are cheap and share the transport, the store, the session state
/// and the refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    store: Arc<dyn CredentialStore>,
    host: Arc<dyn SessionHost>,
    state: AuthState,
    interceptor: RequestInterceptor,
    coordinator: RefreshCoordinator,
}

impl ApiClient {
    /// Create a client using [`RefreshMode::PerCall`].
    ///
    /// Session state is initialized from `store`.
    pub fn new(
        http: HttpClient,
        store: Arc<dyn CredentialStore>,
        host: Arc<dyn SessionHost>,
    ) -> Self {
        Self::with_refresh_mode(http, store, host, RefreshMode::default())
    }

    pub fn with_refresh_mode(
        http: HttpClient,
        store: Arc<dyn CredentialStore>,
        host: Arc<dyn SessionHost>,
        mode: RefreshMode,
    ) -> Self {
        let state = AuthState::from_store(store.as_ref());
        let interceptor = RequestInterceptor::new(store.clone());
        let coordinator =
            RefreshCoordinator::new(http.clone(), store.clone(), state.clone(), host.clone(), mode);

        Self {
            inner: Arc::new(ClientInner {
                http,
                store,
                host,
                state,
                interceptor,
                coordinator,
            }),
        }
    }

    /// Send an authenticated request.
    ///
    /// Attaches the current access token, sends, and on 401/403 refreshes the
    /// token and replays once. Returns the 2xx response, or an error: other
    /// statuses come back as [`abacus_core::error::ApiError`] with status and
    /// body untouched.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn request(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        self.inner.interceptor.attach(&mut request)?;
        let response = self.inner.http.send(&request).await?;
        self.inner.coordinator.handle(request, response).await
    }

    /// Send an authenticated request and decode the JSON response body.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.request(request).await?.json()
    }

    /// Send a request with no credentials and no refresh handling.
    pub async fn send_public(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.clear_authorization();
        self.inner.http.send(&request).await?.into_result()
    }

    /// Send with the current access token but without refresh handling.
    pub(crate) async fn send_once(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        self.inner.interceptor.attach(&mut request)?;
        self.inner.http.send(&request).await?.into_result()
    }

    pub fn state(&self) -> &AuthState {
        &self.inner.state
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    pub fn host(&self) -> &Arc<dyn SessionHost> {
        &self.inner.host
    }

    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.inner.coordinator.mode()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", self.inner.http.base())
            .field("state", &self.inner.state.snapshot())
            .field("refresh_mode", &self.inner.coordinator.mode())
            .finish()
    }
}
