//! HTTP client for the external authentication/database provider.
//!
//! The provider owns credential storage, session issuance, OTP delivery, and
//! the `user_profiles` table; this module only shuttles requests and surfaces
//! the provider's error messages verbatim. Auth endpoints live under
//! `/auth/v1`, table access under `/rest/v1`.

pub mod auth;
pub mod table;
pub mod types;

use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
    service_key: Option<SecretString>,
}

impl Client {
    /// Build a provider client from CLI globals.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        // Fail fast on malformed URLs instead of on the first request.
        Url::parse(&globals.provider_url)?;

        let http = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: globals.provider_url.clone(),
            anon_key: globals.provider_anon_key.clone(),
            service_key: globals.provider_service_key.clone(),
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }

    /// Key used for table writes; the service-role key when configured.
    pub(crate) fn table_key(&self) -> &str {
        self.service_key
            .as_ref()
            .map_or_else(|| self.anon_key.expose_secret(), ExposeSecret::expose_secret)
    }

    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<String> {
        let url = Url::parse(&self.base_url)?;

        let scheme = url.scheme();

        let host = url
            .host()
            .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
            .to_owned();

        let port = match url.port() {
            Some(p) => p,
            None => match scheme {
                "http" => 80,
                "https" => 443,
                _ => return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme)),
            },
        };

        Ok(format!("{scheme}://{host}:{port}{endpoint}"))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("anon_key", &"***")
            .field("service_key", &self.service_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

/// Extract the provider's error message from a failed response body.
///
/// The provider is not consistent about the field name, so try the common
/// ones before falling back to the HTTP status.
pub(crate) fn error_message(status: StatusCode, body: &Value) -> String {
    for field in ["error_description", "msg", "message", "error"] {
        if let Some(message) = body[field].as_str() {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    status.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str) -> Result<Client> {
        let globals = GlobalArgs::new(base_url.to_string(), SecretString::from("anon"));
        Client::new(&globals)
    }

    #[test]
    fn test_endpoint_url_default_ports() -> Result<()> {
        let https = client("https://project.supabase.co")?;
        assert_eq!(
            https.endpoint_url("/auth/v1/user")?,
            "https://project.supabase.co:443/auth/v1/user"
        );

        let http = client("http://localhost")?;
        assert_eq!(
            http.endpoint_url("/auth/v1/user")?,
            "http://localhost:80/auth/v1/user"
        );
        Ok(())
    }

    #[test]
    fn test_endpoint_url_explicit_port() -> Result<()> {
        let client = client("http://localhost:54321")?;
        assert_eq!(
            client.endpoint_url("/rest/v1/user_profiles")?,
            "http://localhost:54321/rest/v1/user_profiles"
        );
        Ok(())
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(client("not a url").is_err());
    }

    #[test]
    fn test_endpoint_url_rejects_unsupported_scheme() -> Result<()> {
        let client = client("ftp://example.com")?;
        assert!(client.endpoint_url("/auth/v1/user").is_err());
        Ok(())
    }

    #[test]
    fn test_error_message_field_priority() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, &json!({"error_description": "Invalid login credentials"})),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(status, &json!({"msg": "Phone not confirmed"})),
            "Phone not confirmed"
        );
        assert_eq!(
            error_message(status, &json!({"message": "duplicate key value"})),
            "duplicate key value"
        );
        assert_eq!(error_message(status, &json!({})), status.to_string());
    }

    #[test]
    fn test_table_key_falls_back_to_anon() -> Result<()> {
        let anon_only = client("https://project.supabase.co")?;
        assert_eq!(anon_only.table_key(), "anon");

        let globals = GlobalArgs::new(
            "https://project.supabase.co".to_string(),
            SecretString::from("anon"),
        )
        .with_service_key(SecretString::from("service"));
        let with_service = Client::new(&globals)?;
        assert_eq!(with_service.table_key(), "service");
        Ok(())
    }

    #[test]
    fn test_debug_redacts_keys() -> Result<()> {
        let globals = GlobalArgs::new(
            "https://project.supabase.co".to_string(),
            SecretString::from("sb-publishable-key"),
        );
        let client = Client::new(&globals)?;
        let rendered = format!("{client:?}");
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("sb-publishable-key"));
        Ok(())
    }
}
