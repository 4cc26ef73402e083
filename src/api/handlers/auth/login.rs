//! POST /v1/auth/login

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use tracing::{debug, instrument};

use super::state::{AuthChange, AuthState};
use super::types::{ErrorResponse, LoginRequest, LoginResponse};
use super::ROUTE_HOME;
use crate::api::validation::{validate_login, CredentialIdent};
use crate::provider::auth::SignInIdent;
use crate::provider::Client;

/// Authenticate with email+password or phone+password.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Provider rejected the credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::api::validation::ValidationErrors),
    ),
    tag = "auth"
)]
#[instrument(skip(state, client, payload))]
pub async fn login(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let credentials = match validate_login(&request) {
        Ok(credentials) => credentials,
        Err(errors) => return errors.into_response(),
    };

    let ident = match &credentials.ident {
        CredentialIdent::Email(email) => SignInIdent::Email(email),
        CredentialIdent::Phone(phone) => SignInIdent::Phone(phone),
    };

    match client
        .sign_in_with_password(ident, &credentials.password)
        .await
    {
        Ok(session) => {
            state.events().publish(AuthChange::SignedIn, Some(session));

            Json(LoginResponse {
                redirect_to: ROUTE_HOME.to_string(),
            })
            .into_response()
        }

        Err(error) => {
            debug!("login rejected: {}", error);

            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(error.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::test_support::{
        auth_state, provider_client, provider_client_at, response_json, spawn_provider,
    };
    use axum::{routing::post, Router};
    use serde_json::json;

    #[tokio::test]
    async fn missing_payload_is_bad_request() {
        let response = login(
            Extension(auth_state()),
            Extension(provider_client()),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_email_fails_validation_before_any_request() {
        let request: LoginRequest = serde_json::from_value(json!({
            "email": "not-an-email",
            "password": "secret1"
        }))
        .expect("request");

        let response = login(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn accepted_credentials_redirect_home_and_publish_signed_in() {
        let base_url = spawn_provider(Router::new().route(
            "/auth/v1/token",
            post(|| async {
                Json(json!({
                    "access_token": "tok-123",
                    "token_type": "bearer",
                    "expires_in": 3600
                }))
            }),
        ))
        .await;

        let state = auth_state();
        let request: LoginRequest = serde_json::from_value(json!({
            "email": "alice@example.com",
            "password": "secret1"
        }))
        .expect("request");

        let response = login(
            Extension(state.clone()),
            Extension(provider_client_at(&base_url)),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["redirect_to"], "/");
        assert!(body.get("error").is_none());

        let snapshot = state.events().current();
        assert_eq!(snapshot.change, AuthChange::SignedIn);
        assert_eq!(
            snapshot.session.map(|session| session.access_token),
            Some("tok-123".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_provider_message() {
        let base_url = spawn_provider(Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error_description": "Invalid login credentials" })),
                )
            }),
        ))
        .await;

        let state = auth_state();
        let request: LoginRequest = serde_json::from_value(json!({
            "email": "alice@example.com",
            "password": "wrong-password"
        }))
        .expect("request");

        let response = login(
            Extension(state.clone()),
            Extension(provider_client_at(&base_url)),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Invalid login credentials");
        assert!(body.get("redirect_to").is_none());

        // No session change was broadcast.
        assert_eq!(state.events().current().seq, 0);
    }

    #[tokio::test]
    async fn short_password_fails_validation() {
        let request: LoginRequest = serde_json::from_value(json!({
            "email": "alice@example.com",
            "password": "123"
        }))
        .expect("request");

        let response = login(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
