//! Error types for abacus.
//!
//! A single error type covers every failure mode of the client, with explicit
//! categories so callers can tell a network problem from an authorization
//! failure from a business rejection such as insufficient credits.

use std::fmt;
use thiserror::Error;

/// The unified error type for abacus operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, undecodable body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authorization errors (rejected credentials, ended session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Any other non-2xx response from the API, passed through untouched.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store errors.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// Returns true if this error is an authorization failure of any kind.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Returns true if the session was terminated while handling this call.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Error::Auth(AuthError::SessionEnded(_)))
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Auth(AuthError::Unauthorized { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("could not decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API rejected the call with 401 or 403 and no refresh could fix it.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16, body: String },

    /// Credential refresh failed and the session was terminated.
    #[error("session ended: {0}")]
    SessionEnded(RefreshFailure),

    /// Login was rejected. Transport detail is deliberately not carried.
    #[error("login not successful")]
    LoginFailed,

    /// Signup was rejected. Transport detail is deliberately not carried.
    #[error("signup not successful")]
    SignupFailed,
}

/// Why a credential refresh could not produce a new access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    /// No refresh token was stored.
    #[error("no refresh token available")]
    Unavailable,

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected (HTTP {status})")]
    Rejected { status: u16 },

    /// The refresh call never got an answer.
    #[error("refresh request failed: {message}")]
    Transport { message: String },

    /// The refresh endpoint answered 2xx without a usable token.
    #[error("invalid refresh response: {message}")]
    InvalidResponse { message: String },

    /// The credential store could not be read or written.
    #[error("credential store unavailable: {message}")]
    Store { message: String },

    /// The session was cleared (logout) while the refresh was in flight.
    #[error("session cleared during refresh")]
    Cleared,
}

/// A non-2xx API response other than an authorization failure.
///
/// Status and body are kept verbatim for the business layer to interpret.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Message extracted from a JSON error body, if present.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });

        Self {
            status,
            body,
            message,
        }
    }

    /// Payment Required: the account does not hold enough credits.
    pub fn is_insufficient_credits(&self) -> bool {
        self.status == 402
    }

    /// Check if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A token contains characters that cannot go into an HTTP header.
    #[error("token is not a valid header value")]
    Token,

    /// Unknown calculator operation.
    #[error("unknown operation '{value}'")]
    Operation { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Stored data could not be encoded or decoded.
    #[error("malformed credential data: {message}")]
    Format { message: String },
}
