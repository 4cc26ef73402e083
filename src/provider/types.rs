//! Wire types owned by the provider's auth and table APIs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque provider-issued session. The application reads it and reacts to it;
/// its lifecycle (expiry, refresh) is controlled entirely by the provider.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

/// Identity record attached to a session or returned by the user endpoint.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Set by the provider once the confirmation link was followed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<String>,
    /// Profile fields (`full_name`, `designation`, `phone`) attached at signup.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata["full_name"].as_str()
    }

    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Closed set of roles a profile record may carry.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Validated profile row forwarded to the provider's `user_profiles` table.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct ProfileInsert {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub designation: String,
}
