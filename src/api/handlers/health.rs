//! Health probe handler.
//!
//! `/health` reports build identity plus provider reachability; the status
//! code follows the provider probe so orchestrators can act on it.

use crate::GIT_COMMIT_HASH;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::provider::Client;

const HEALTH_PROVIDER_TIMEOUT_SECONDS: u64 = 2;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    provider: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Auth provider is reachable", body = Health),
        (status = 503, description = "Auth provider is unreachable", body = Health)
    ),
    tag = "health",
)]
/// Perform a health check, probing the auth provider.
pub async fn health(method: Method, client: Extension<Arc<Client>>) -> impl IntoResponse {
    let provider_healthy = evaluate_provider_probe(&client.0).await;

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: if provider_healthy {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app_header_value);
            headers
        })
        .map_err(|err| {
            debug!("Failed to parse X-App header: {}", err);
        })
        .unwrap_or_else(|()| HeaderMap::new());

    if provider_healthy {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}

/// Probe provider reachability with a short timeout.
async fn evaluate_provider_probe(client: &Client) -> bool {
    match timeout(
        Duration::from_secs(HEALTH_PROVIDER_TIMEOUT_SECONDS),
        client.health(),
    )
    .await
    {
        Ok(Ok(())) => true,
        Ok(Err(probe_error)) => {
            error!("Provider health check failed: {}", probe_error);
            false
        }
        Err(_) => {
            warn!("Provider health check timed out");
            false
        }
    }
}
