//! Shared fixtures for handler tests.

use std::sync::Arc;

use axum::Router;
use secrecy::SecretString;
use tokio::net::TcpListener;

use super::state::{AuthConfig, AuthState};
use crate::cli::globals::GlobalArgs;
use crate::provider::Client;

pub(crate) fn auth_state() -> Arc<AuthState> {
    Arc::new(AuthState::new(AuthConfig::new(
        "http://localhost:3000".to_string(),
    )))
}

/// A client pointing at an unroutable address. Tests that exercise
/// validation-only paths return before any request is made.
pub(crate) fn provider_client() -> Arc<Client> {
    provider_client_at("http://provider.invalid")
}

pub(crate) fn provider_client_at(base_url: &str) -> Arc<Client> {
    let globals = GlobalArgs::new(base_url.to_string(), SecretString::from("anon"));
    Arc::new(Client::new(&globals).expect("client for test fixtures"))
}

/// Serve a stand-in provider on an ephemeral local port and return its base
/// URL. The task lives until the test's runtime shuts down.
pub(crate) async fn spawn_provider(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub provider");
    let addr = listener.local_addr().expect("stub provider addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });

    format!("http://{addr}")
}

pub(crate) async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json response body")
}
