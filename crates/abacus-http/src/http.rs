//! HTTP transport bound to the API base URL.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use abacus_core::error::{ApiError, AuthError, Error, TransportError};
use abacus_core::{ApiUrl, Result};

use crate::request::ApiRequest;

pub(crate) fn map_transport(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Build a response from parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport)?.to_vec();
        trace!(status = %status, bytes = body.len(), "Received response");
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::Transport(TransportError::Decode {
                message: e.to_string(),
            })
        })
    }

    /// True for 401 Unauthorized and 403 Forbidden.
    pub fn is_auth_failure(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }

    /// Classify the response: 2xx passes through, 401/403 become an
    /// authorization error and anything else a business error carrying the
    /// original status and body.
    pub fn into_result(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else if self.is_auth_failure() {
            Err(AuthError::Unauthorized {
                status: self.status.as_u16(),
                body: self.text(),
            }
            .into())
        } else {
            Err(ApiError::new(self.status.as_u16(), self.text()).into())
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base: ApiUrl,
    timeout: Option<Duration>,
    user_agent: String,
}

impl HttpClientBuilder {
    /// Abort any request that takes longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(map_transport)?;

        Ok(HttpClient {
            client,
            base: self.base,
        })
    }
}

/// Configured transport with a fixed base URL, used for every outbound call.
///
/// This type only moves bytes. It attaches no credentials of its own and does
/// not interpret status codes; see [`crate::ApiClient`] for that.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: ApiUrl,
}

impl HttpClient {
    /// Create a client with default settings for the given base URL.
    pub fn new(base: ApiUrl) -> Result<Self> {
        Self::builder(base).build()
    }

    pub fn builder(base: ApiUrl) -> HttpClientBuilder {
        HttpClientBuilder {
            base,
            timeout: None,
            user_agent: concat!("abacus/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// Send a request exactly as described and read the whole response.
    ///
    /// Only transport failures are errors here; any HTTP status is returned
    /// as an [`ApiResponse`].
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.base.endpoint(request.path());
        debug!(%url, "Sending request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport)?;
        ApiResponse::read(response).await
    }
}
