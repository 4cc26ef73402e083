//! Provider auth endpoints: sign-in, sign-up, OTP, sign-out, user lookup.
//!
//! Every function returns the provider's error message verbatim on failure;
//! invalid credentials and provider outages are not distinguished.

use super::{error_message, types::AuthUser, types::Session, Client};
use anyhow::{anyhow, Result};
use reqwest::Response;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Which identifier a credential carries. Exactly one of email or phone
/// identifies a record, depending on the method the user picked.
#[derive(Debug, Clone, Copy)]
pub enum SignInIdent<'a> {
    Email(&'a str),
    Phone(&'a str),
}

/// Profile fields forwarded to the provider as signup metadata.
#[derive(Debug, Clone)]
pub struct SignupMetadata {
    pub full_name: String,
    pub designation: String,
    pub phone: Option<String>,
}

impl SignupMetadata {
    fn as_json(&self) -> Value {
        json!({
            "full_name": self.full_name,
            "designation": self.designation,
            "phone": self.phone,
        })
    }
}

async fn provider_error(url: &str, response: Response) -> anyhow::Error {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    debug!("provider error from {}: {}", url, body);

    anyhow!("{}", error_message(status, &body))
}

impl Client {
    /// Sign in with email+password or phone+password.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        ident: SignInIdent<'_>,
        password: &str,
    ) -> Result<Session> {
        let url = self.endpoint_url("/auth/v1/token?grant_type=password")?;

        let payload = match ident {
            SignInIdent::Email(email) => json!({ "email": email, "password": password }),
            SignInIdent::Phone(phone) => json!({ "phone": phone, "password": password }),
        };

        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(response.json().await?)
    }

    /// Create an account, attaching the profile fields as user metadata.
    /// Phone signups make the provider send an OTP to the number.
    #[instrument(skip(self, password, metadata))]
    pub async fn sign_up(
        &self,
        ident: SignInIdent<'_>,
        password: &str,
        metadata: &SignupMetadata,
    ) -> Result<Value> {
        let url = self.endpoint_url("/auth/v1/signup")?;

        let payload = match ident {
            SignInIdent::Email(email) => json!({
                "email": email,
                "password": password,
                "data": metadata.as_json(),
            }),
            SignInIdent::Phone(phone) => json!({
                "phone": phone,
                "password": password,
                "data": metadata.as_json(),
            }),
        };

        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(response.json().await?)
    }

    /// Ask the provider to send a one-time code to a phone number.
    #[instrument(skip(self))]
    pub async fn send_otp(&self, phone: &str) -> Result<()> {
        let url = self.endpoint_url("/auth/v1/otp")?;

        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .json(&json!({ "phone": phone }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(())
    }

    /// Exchange a 6-digit SMS code for a session.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<Session> {
        let url = self.endpoint_url("/auth/v1/verify")?;

        let payload = json!({
            "type": "sms",
            "phone": phone,
            "token": code,
        });

        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(response.json().await?)
    }

    /// Revoke the session behind an access token.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = self.endpoint_url("/auth/v1/logout")?;

        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(())
    }

    /// Fetch the user behind an access token.
    #[instrument(skip(self, access_token))]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let url = self.endpoint_url("/auth/v1/user")?;

        let response = self
            .http()
            .get(&url)
            .header("apikey", self.anon_key())
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(response.json().await?)
    }

    /// Reachability probe used by `/health`.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint_url("/auth/v1/health")?;

        let response = self
            .http()
            .get(&url)
            .header("apikey", self.anon_key())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(&url, response).await);
        }

        Ok(())
    }
}
