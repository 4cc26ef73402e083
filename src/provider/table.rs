//! Table access through the provider's REST endpoint.

use super::{error_message, types::ProfileInsert, Client};
use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::instrument;

const USER_PROFILES_TABLE: &str = "user_profiles";

impl Client {
    /// Insert a profile row into the `user_profiles` table.
    ///
    /// Uniqueness and transactionality are whatever the provider guarantees;
    /// no checks are layered on top.
    #[instrument(skip(self))]
    pub async fn insert_profile(&self, profile: &ProfileInsert) -> Result<Value> {
        let url = self.endpoint_url(&format!("/rest/v1/{USER_PROFILES_TABLE}"))?;

        let key = self.table_key();

        let response = self
            .http()
            .post(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=representation")
            // The REST endpoint takes a batch; a single insert is a one-row batch.
            .json(&[profile])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(anyhow!("{}", error_message(status, &body)));
        }

        Ok(response.json().await?)
    }
}
