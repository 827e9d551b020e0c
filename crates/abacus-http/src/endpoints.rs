//! API endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const LOGIN: &str = "/login";

pub const SIGNUP: &str = "/signup";

/// Authenticated with the refresh token, not the access token.
pub const REFRESH: &str = "/refresh";

pub const LOGOUT: &str = "/logout";

pub const USER_CREDITS: &str = "/users/credits";

pub const USER_OPERATION: &str = "/users/operation";

pub const RECORDS_HISTORY: &str = "/records/history";

pub const RECORDS_DELETE: &str = "/records/delete";

/// Public; served without credentials.
pub const OPERATIONS: &str = "/operations";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login and signup.
#[derive(Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from login and signup.
#[derive(Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub username: String,
}

/// Response from refresh. Only the access token is reissued.
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Response from GET /users/credits. Operation costs are fractional, so the
/// balance is too.
#[derive(Debug, Deserialize)]
pub struct CreditsResponse {
    pub credits: f64,
}

/// Request body for PUT /users/credits.
#[derive(Debug, Serialize)]
pub struct CreditsRequest<'a> {
    pub credits: u64,
    pub action: &'a str,
}

/// Request body for POST /users/operation.
#[derive(Debug, Serialize)]
pub struct OperationRequest<'a> {
    pub operation_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

/// Response from POST /users/operation.
#[derive(Debug, Deserialize)]
pub struct OperationResponse {
    pub result: serde_json::Value,
}
