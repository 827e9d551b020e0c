//! abacus-http - Authenticated HTTP client for the calculator API.
//!
//! Every business call goes through [`ApiClient::request`], which runs a fixed
//! pipeline of stages:
//!
//! 1. [`RequestInterceptor`] attaches the stored access token as a bearer credential.
//! 2. [`HttpClient`] sends the request to the configured base URL.
//! 3. [`RefreshCoordinator`] inspects the response. On 401/403 it refreshes the
//!    access token once, replays the request once, and returns the replay's result.
//!    If the refresh is impossible the session is cleared and the host is told to
//!    return to the login entry point.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use abacus_core::{ApiUrl, Credentials, MemoryCredentialStore};
//! use abacus_http::{ApiClient, AuthFacade, CalculatorApi, ChannelHost, HttpClient};
//!
//! # async fn example() -> Result<(), abacus_core::Error> {
//! let http = HttpClient::new(ApiUrl::new("https://calc.example.com/api/v1")?)?;
//! let (host, _terminations) = ChannelHost::new();
//! let client = ApiClient::new(http, Arc::new(MemoryCredentialStore::new()), Arc::new(host));
//!
//! AuthFacade::new(client.clone())
//!     .login(&Credentials::new("alice@example.com", "password123"))
//!     .await?;
//!
//! let credits = CalculatorApi::new(client).credits().await?;
//! println!("{credits} credits left");
//! # Ok(())
//! # }
//! ```

mod auth;
mod calculator;
mod client;
mod endpoints;
mod host;
mod http;
mod interceptor;
mod refresh;
mod request;
mod state;

pub use auth::AuthFacade;
pub use calculator::{
    CalculatorApi, Operation, OperationInfo, OperationKind, OperationRecord, RecordsPage,
    RecordsQuery, SortDirection,
};
pub use client::ApiClient;
pub use host::ChannelHost;
pub use http::{ApiResponse, HttpClient, HttpClientBuilder};
pub use interceptor::RequestInterceptor;
pub use refresh::{RefreshCoordinator, RefreshMode};
pub use request::ApiRequest;
pub use state::{AuthSnapshot, AuthState};
