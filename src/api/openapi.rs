use utoipa::OpenApi;

use crate::api::handlers::{auth, health, users};
use crate::api::validation::{UserForm, ValidationErrors};
use crate::provider::types::{AuthUser, ProfileInsert, Role, Session};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login::login,
        auth::signup::signup,
        auth::otp::send_otp,
        auth::otp::verify_otp,
        auth::session::auth_data,
        auth::session::events,
        auth::session::logout,
        users::list_users,
        users::create_user,
        users::delete_user,
    ),
    components(schemas(
        health::Health,
        auth::types::AuthMethod,
        auth::types::LoginRequest,
        auth::types::LoginResponse,
        auth::types::SignupRequest,
        auth::types::SignupResponse,
        auth::types::SendOtpRequest,
        auth::types::SendOtpResponse,
        auth::types::VerifyOtpRequest,
        auth::types::VerifyOtpResponse,
        auth::types::AuthDataResponse,
        auth::types::AuthDataErrors,
        auth::types::ErrorResponse,
        auth::state::AuthChange,
        auth::state::AuthSnapshot,
        users::UserProfile,
        users::CreateUserResponse,
        UserForm,
        ValidationErrors,
        AuthUser,
        Session,
        Role,
        ProfileInsert,
    )),
    tags(
        (name = "auth", description = "Login, signup, OTP, session and lifecycle events"),
        (name = "users", description = "User directory"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = openapi();
        for path in [
            "/health",
            "/v1/auth/login",
            "/v1/auth/signup",
            "/v1/auth/otp/send",
            "/v1/auth/otp/verify",
            "/v1/auth/session",
            "/v1/auth/events",
            "/v1/auth/logout",
            "/v1/users",
            "/v1/users/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
