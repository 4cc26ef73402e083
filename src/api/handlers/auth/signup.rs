//! POST /v1/auth/signup

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use tracing::{debug, instrument};

use super::flow::FlowKind;
use super::state::AuthState;
use super::types::{ErrorResponse, SignupRequest, SignupResponse};
use super::{ROUTE_CHECK_EMAIL, ROUTE_VERIFY_OTP_SIGNUP};
use crate::api::validation::{validate_signup, CredentialIdent};
use crate::provider::auth::SignInIdent;
use crate::provider::Client;

/// Create an account. Email signups get a confirmation link; phone signups
/// get an OTP and a flow id for the verify step.
#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created, verification pending", body = SignupResponse),
        (status = 400, description = "Provider rejected the signup", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::api::validation::ValidationErrors),
    ),
    tag = "auth"
)]
#[instrument(skip(state, client, payload))]
pub async fn signup(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let record = match validate_signup(&request) {
        Ok(record) => record,
        Err(errors) => return errors.into_response(),
    };

    let ident = match &record.ident {
        CredentialIdent::Email(email) => SignInIdent::Email(email),
        CredentialIdent::Phone(phone) => SignInIdent::Phone(phone),
    };

    if let Err(error) = client
        .sign_up(ident, &record.password, &record.metadata)
        .await
    {
        debug!("signup rejected: {}", error);

        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response();
    }

    match record.ident {
        CredentialIdent::Email(_) => Json(SignupResponse {
            redirect_to: ROUTE_CHECK_EMAIL.to_string(),
            flow_id: None,
        })
        .into_response(),

        CredentialIdent::Phone(phone) => {
            // The provider already sent the code; remember the number server
            // side so verify only needs the flow id back.
            let flow_id = state.flows().begin(FlowKind::Signup, phone).await;

            Json(SignupResponse {
                redirect_to: ROUTE_VERIFY_OTP_SIGNUP.to_string(),
                flow_id: Some(flow_id),
            })
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::test_support::{auth_state, provider_client};
    use serde_json::json;

    #[tokio::test]
    async fn missing_payload_is_bad_request() {
        let response = signup(
            Extension(auth_state()),
            Extension(provider_client()),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn incomplete_form_fails_validation_before_any_request() {
        let request: SignupRequest = serde_json::from_value(json!({
            "method": "phone",
            "full_name": "A",
            "phone": "123",
            "password": "123"
        }))
        .expect("request");

        let response = signup(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
