//! POST /v1/auth/otp/send and /v1/auth/otp/verify
//!
//! Both steps report every failure to the caller; a code that was never sent
//! or never verified is never presented as success.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use tracing::{debug, instrument};

use super::flow::FlowKind;
use super::state::{AuthChange, AuthState};
use super::types::{
    ErrorResponse, SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use super::ROUTE_VERIFY_OTP_LOGIN;
use crate::api::validation::{checked_phone, valid_otp_code, ValidationErrors, MSG_OTP_DIGITS};
use crate::provider::Client;

/// Send a one-time code to a phone number for a login.
#[utoipa::path(
    post,
    path = "/v1/auth/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = SendOtpResponse),
        (status = 400, description = "Provider could not send the code", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrors),
    ),
    tag = "auth"
)]
#[instrument(skip(state, client, payload))]
pub async fn send_otp(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    payload: Option<Json<SendOtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let mut errors = ValidationErrors::default();
    let phone = checked_phone(request.phone.as_deref().unwrap_or(""), &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }

    if let Err(error) = client.send_otp(&phone).await {
        debug!("otp send failed: {}", error);

        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response();
    }

    let flow_id = state.flows().begin(FlowKind::Login, phone).await;

    Json(SendOtpResponse {
        flow_id,
        redirect_to: ROUTE_VERIFY_OTP_LOGIN.to_string(),
    })
    .into_response()
}

/// Exchange a flow id and 6-digit code for a session.
#[utoipa::path(
    post,
    path = "/v1/auth/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = VerifyOtpResponse),
        (status = 400, description = "Unknown or expired flow", body = ErrorResponse),
        (status = 401, description = "Provider rejected the code", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrors),
    ),
    tag = "auth"
)]
#[instrument(skip(state, client, payload))]
pub async fn verify_otp(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let code = request.code.as_deref().unwrap_or("");
    if !valid_otp_code(code) {
        let mut errors = ValidationErrors::default();
        errors.push("code", MSG_OTP_DIGITS);
        return errors.into_response();
    }

    let Some(flow_id) = request.flow_id.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Verification flow expired or unknown. Request a new code.",
            )),
        )
            .into_response();
    };

    let Some(flow) = state.flows().take(flow_id).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Verification flow expired or unknown. Request a new code.",
            )),
        )
            .into_response();
    };

    match client.verify_otp(&flow.phone, code).await {
        Ok(session) => {
            state
                .events()
                .publish(AuthChange::OtpVerified, Some(session));

            Json(VerifyOtpResponse {
                redirect_to: flow.kind.redirect_after_verify().to_string(),
            })
            .into_response()
        }

        Err(error) => {
            debug!("otp verify failed: {}", error);

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
    async fn send_rejects_short_phone() {
        let request: SendOtpRequest =
            serde_json::from_value(json!({ "phone": "12345" })).expect("request");

        let response = send_otp(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn verify_rejects_non_numeric_code() {
        let request: VerifyOtpRequest =
            serde_json::from_value(json!({ "flow_id": "whatever", "code": "12345a" }))
                .expect("request");

        let response = verify_otp(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn verify_rejects_unknown_flow() {
        let request: VerifyOtpRequest =
            serde_json::from_value(json!({ "flow_id": "01ARZ3NDEKTSV4RRFFQ69G5FAV", "code": "123456" }))
                .expect("request");

        let response = verify_otp(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn send_accepts_a_formatted_phone_and_opens_a_flow() {
        let base_url = spawn_provider(Router::new().route(
            "/auth/v1/otp",
            post(|| async { Json(json!({})) }),
        ))
        .await;

        let state = auth_state();
        let request: SendOtpRequest =
            serde_json::from_value(json!({ "phone": "+880 1712-345678" })).expect("request");

        let response = send_otp(
            Extension(state.clone()),
            Extension(provider_client_at(&base_url)),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["redirect_to"], "/auth/verify-otp?type=login");

        // The flow carries the sanitized number.
        let flow_id = body["flow_id"].as_str().expect("flow id").to_string();
        let flow = state.flows().take(&flow_id).await;
        assert!(flow.is_some());
        if let Some(flow) = flow {
            assert_eq!(flow.phone, "8801712345678");
            assert_eq!(flow.kind, FlowKind::Login);
        }
    }

    #[tokio::test]
    async fn verify_accepted_code_redirects_by_flow_kind() {
        let base_url = spawn_provider(Router::new().route(
            "/auth/v1/verify",
            post(|| async {
                Json(json!({
                    "access_token": "tok-456",
                    "token_type": "bearer"
                }))
            }),
        ))
        .await;

        let state = auth_state();
        let flow_id = state
            .flows()
            .begin(FlowKind::Signup, "12345678901".to_string())
            .await;

        let request: VerifyOtpRequest =
            serde_json::from_value(json!({ "flow_id": flow_id, "code": "123456" }))
                .expect("request");

        let response = verify_otp(
            Extension(state.clone()),
            Extension(provider_client_at(&base_url)),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["redirect_to"], "/onboarding");

        let snapshot = state.events().current();
        assert_eq!(snapshot.change, AuthChange::OtpVerified);
        assert_eq!(
            snapshot.session.map(|session| session.access_token),
            Some("tok-456".to_string())
        );
    }

    #[tokio::test]
    async fn verify_surfaces_the_provider_rejection() {
        let base_url = spawn_provider(Router::new().route(
            "/auth/v1/verify",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error_description": "Token has expired or is invalid" })),
                )
            }),
        ))
        .await;

        let state = auth_state();
        let flow_id = state
            .flows()
            .begin(FlowKind::Login, "12345678901".to_string())
            .await;

        let request: VerifyOtpRequest =
            serde_json::from_value(json!({ "flow_id": flow_id.clone(), "code": "123456" }))
                .expect("request");

        let response = verify_otp(
            Extension(state.clone()),
            Extension(provider_client_at(&base_url)),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Token has expired or is invalid");

        // The flow was consumed and no session change was broadcast.
        assert!(state.flows().take(&flow_id).await.is_none());
        assert_eq!(state.events().current().seq, 0);
    }

    #[tokio::test]
    async fn verify_rejects_missing_flow_id() {
        let request: VerifyOtpRequest =
            serde_json::from_value(json!({ "code": "123456" })).expect("request");

        let response = verify_otp(
            Extension(auth_state()),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
