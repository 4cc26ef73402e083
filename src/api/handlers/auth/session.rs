//! GET /v1/auth/session, GET /v1/auth/events, POST /v1/auth/logout

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::{debug, instrument};

use super::state::{AuthChange, AuthSnapshot, AuthState};
use super::types::{AuthDataErrors, AuthDataQuery, AuthDataResponse, EventsQuery};
use crate::provider::Client;

/// How long an events request may hang before returning empty-handed.
const EVENTS_POLL_TIMEOUT: Duration = Duration::from_secs(25);

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Fetch the requested auth data. The user and session lookups run
/// concurrently and fail independently; one failing never blanks the other.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    params(AuthDataQuery),
    responses(
        (status = 200, description = "Requested auth data with per-lookup errors", body = AuthDataResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip(state, client, headers))]
pub async fn auth_data(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    Query(query): Query<AuthDataQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = extract_bearer_token(&headers);

    let user_lookup = async {
        if !query.user {
            return (None, None);
        }

        let Some(token) = token else {
            return (None, Some("Auth session missing!".to_string()));
        };

        match client.get_user(token).await {
            Ok(user) => (Some(user), None),
            Err(error) => {
                debug!("user lookup failed: {}", error);
                (None, Some(error.to_string()))
            }
        }
    };

    let session_lookup = async {
        if !query.session {
            return (None, None);
        }

        (state.events().current().session, None)
    };

    let ((user, user_error), (session, session_error)) =
        tokio::join!(user_lookup, session_lookup);

    Json(AuthDataResponse {
        user,
        session,
        errors: AuthDataErrors {
            user_error,
            session_error,
        },
    })
}

/// Long-poll for an auth change newer than `since`. Answers immediately when
/// one already happened, otherwise waits up to the poll timeout and returns
/// 204 so the client can poll again.
#[utoipa::path(
    get,
    path = "/v1/auth/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "A newer auth snapshot", body = AuthSnapshot),
        (status = 204, description = "Nothing newer within the poll window"),
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn events(
    Extension(state): Extension<Arc<AuthState>>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    let mut rx = state.events().subscribe();

    let newer = tokio::time::timeout(
        EVENTS_POLL_TIMEOUT,
        rx.wait_for(|snapshot| snapshot.seq > query.since),
    )
    .await;

    match newer {
        Ok(Ok(snapshot)) => Json(snapshot.clone()).into_response(),
        // Timeout, or the sender is gone during shutdown.
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Revoke the current session. Provider failures are logged but the local
/// sign-out always completes.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Signed out"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip(state, client, headers))]
pub async fn logout(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(client): Extension<Arc<Client>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = extract_bearer_token(&headers) {
        if let Err(error) = client.sign_out(token).await {
            debug!("provider sign-out failed: {}", error);
        }
    }

    state.events().publish(AuthChange::SignedOut, None);

    StatusCode::NO_CONTENT
}
