//! Attach the stored access token to outgoing requests.

use std::sync::Arc;

use tracing::trace;

use abacus_core::{CredentialStore, Result};

use crate::request::ApiRequest;

/// Sets `Authorization: Bearer <access token>` on every outgoing request.
///
/// Runs once per call, before transmission. The token is read from the
/// [`CredentialStore`] at that moment, so a token refreshed by another call
/// is picked up immediately. With no stored token the request goes out
/// without any `Authorization` header.
#[derive(Clone)]
pub struct RequestInterceptor {
    store: Arc<dyn CredentialStore>,
}

impl RequestInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn attach(&self, request: &mut ApiRequest) -> Result<()> {
        match self.store.access_token()? {
            Some(token) => {
                trace!(path = request.path(), "Attaching access token");
                request.set_bearer(token.as_str())
            }
            None => {
                trace!(path = request.path(), "No access token, sending unauthenticated");
                request.clear_authorization();
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for RequestInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestInterceptor").finish_non_exhaustive()
    }
}
