//! Request and response payloads for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::provider::types::{AuthUser, Session};

/// Which identifier the client authenticates with.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Email,
    Phone,
}

#[derive(ToSchema, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub method: AuthMethod,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginResponse {
    /// Where the client should navigate after a successful login.
    pub redirect_to: String,
}

#[derive(ToSchema, Deserialize, Debug, Clone, Default)]
pub struct SignupRequest {
    #[serde(default)]
    pub method: AuthMethod,
    pub full_name: Option<String>,
    pub designation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct SignupResponse {
    pub redirect_to: String,
    /// Present for phone signups; the verify step needs it back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug, Clone, Default)]
pub struct SendOtpRequest {
    pub phone: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct SendOtpResponse {
    pub flow_id: String,
    pub redirect_to: String,
}

#[derive(ToSchema, Deserialize, Debug, Clone, Default)]
pub struct VerifyOtpRequest {
    pub flow_id: Option<String>,
    pub code: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct VerifyOtpResponse {
    pub redirect_to: String,
}

/// Selector flags for `GET /v1/auth/session`. Both default to off so callers
/// only pay for the lookups they ask for.
#[derive(IntoParams, Deserialize, Debug, Clone, Copy, Default)]
pub struct AuthDataQuery {
    /// Fetch the user record behind the bearer token.
    #[serde(default)]
    pub user: bool,
    /// Include the current session snapshot.
    #[serde(default)]
    pub session: bool,
}

/// Per-lookup failures; one lookup failing never blanks the other.
#[derive(ToSchema, Serialize, Debug, Default)]
pub struct AuthDataErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_error: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct AuthDataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub errors: AuthDataErrors,
}

#[derive(IntoParams, Deserialize, Debug, Clone, Copy, Default)]
pub struct EventsQuery {
    /// Sequence number of the last snapshot the caller has seen.
    #[serde(default)]
    pub since: u64,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
