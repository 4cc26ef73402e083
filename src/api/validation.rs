//! Declarative field validation for the auth and user-management forms.
//!
//! Each validator takes the raw request, applies the form's rules, and
//! produces either a typed value carrying exactly the validated fields or a
//! field-keyed set of error messages. No side effects; nothing here talks to
//! the provider.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::api::handlers::auth::types::{AuthMethod, LoginRequest, SignupRequest};
use crate::provider::auth::SignupMetadata;
use crate::provider::types::{ProfileInsert, Role};

pub const MSG_EMAIL: &str = "Enter a valid email";
pub const MSG_PASSWORD_MIN: &str = "Password must be at least 6 characters";
pub const MSG_PHONE_MIN: &str = "Phone number must be at least 11 digits";
pub const MSG_PHONE_MAX: &str = "Phone number cannot exceed 14 digits";
pub const MSG_FULL_NAME_MIN: &str = "Full name must be at least 2 characters";
pub const MSG_DESIGNATION_MIN: &str = "Designation must be at least 2 characters";
pub const MSG_FULL_NAME_REQUIRED: &str = "Full name is required";
pub const MSG_DESIGNATION_REQUIRED: &str = "Designation is required";
pub const MSG_USER_EMAIL: &str = "Please enter a valid email address";
pub const MSG_ROLE: &str = "Role must be one of admin, manager or user";
pub const MSG_OTP_DIGITS: &str = "Your one-time password must be 6 digits.";

const MAX_PHONE_DIGITS: usize = 14;
const MIN_PHONE_DIGITS: usize = 11;

/// Field-keyed validation failures, serialized as `{ "errors": { field: message } }`.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        // First failing rule wins, matching the form's per-field display.
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}

/// Exactly one of email or phone identifies a credential, depending on the
/// method the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialIdent {
    Email(String),
    Phone(String),
}

/// Accepted login input.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub ident: CredentialIdent,
    pub password: String,
}

/// Accepted signup input.
#[derive(Debug, Clone)]
pub struct SignupRecord {
    pub ident: CredentialIdent,
    pub password: String,
    pub metadata: SignupMetadata,
}

/// Basic email format check on trimmed, lowercased input.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Strip every non-digit character and cap the result at 14 digits.
#[must_use]
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect()
}

/// Check a 6-digit one-time code.
#[must_use]
pub fn valid_otp_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sanitize a phone number, then apply the length rules to its digit count.
/// Formatting characters never count against the limits, so
/// `"+880 1712-345678"` is 13 digits and passes. Returns the digits that will
/// be forwarded.
pub(crate) fn checked_phone(input: &str, errors: &mut ValidationErrors) -> String {
    let digit_count = input.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count < MIN_PHONE_DIGITS {
        errors.push("phone", MSG_PHONE_MIN);
    } else if digit_count > MAX_PHONE_DIGITS {
        errors.push("phone", MSG_PHONE_MAX);
    }
    sanitize_phone(input)
}

fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.len() < 6 {
        errors.push("password", MSG_PASSWORD_MIN);
    }
}

fn check_ident(
    method: AuthMethod,
    email: Option<&str>,
    phone: Option<&str>,
    errors: &mut ValidationErrors,
) -> CredentialIdent {
    match method {
        AuthMethod::Email => {
            let email = normalize_email(email.unwrap_or(""));
            if !valid_email(&email) {
                errors.push("email", MSG_EMAIL);
            }
            CredentialIdent::Email(email)
        }
        AuthMethod::Phone => {
            let phone = checked_phone(phone.unwrap_or(""), errors);
            CredentialIdent::Phone(phone)
        }
    }
}

/// Validate the login form: email or phone, plus password.
///
/// # Errors
///
/// Returns the field-keyed messages when any rule fails
pub fn validate_login(request: &LoginRequest) -> Result<LoginCredentials, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let ident = check_ident(
        request.method,
        request.email.as_deref(),
        request.phone.as_deref(),
        &mut errors,
    );

    let password = request.password.clone().unwrap_or_default();
    check_password(&password, &mut errors);

    errors.into_result(LoginCredentials { ident, password })
}

/// Validate the signup form.
///
/// # Errors
///
/// Returns the field-keyed messages when any rule fails
pub fn validate_signup(request: &SignupRequest) -> Result<SignupRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let full_name = request.full_name.as_deref().unwrap_or("").trim().to_string();
    if full_name.len() < 2 {
        errors.push("full_name", MSG_FULL_NAME_MIN);
    }

    let designation = request
        .designation
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();
    if designation.len() < 2 {
        errors.push("designation", MSG_DESIGNATION_MIN);
    }

    let ident = check_ident(
        request.method,
        request.email.as_deref(),
        request.phone.as_deref(),
        &mut errors,
    );

    let password = request.password.clone().unwrap_or_default();
    check_password(&password, &mut errors);

    // Email signups may still carry an optional phone in the metadata.
    let metadata_phone = match &ident {
        CredentialIdent::Phone(phone) => Some(phone.clone()),
        CredentialIdent::Email(_) => request
            .phone
            .as_deref()
            .map(sanitize_phone)
            .filter(|phone| !phone.is_empty()),
    };

    errors.into_result(SignupRecord {
        ident,
        password,
        metadata: SignupMetadata {
            full_name,
            designation,
            phone: metadata_phone,
        },
    })
}

/// Raw user-creation form from the administration screen.
#[derive(Debug, Clone, Default, serde::Deserialize, ToSchema)]
pub struct UserForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub designation: Option<String>,
}

/// Validate the user-creation form from the administration screen.
///
/// # Errors
///
/// Returns the field-keyed messages when any rule fails
pub fn validate_user_form(request: &UserForm) -> Result<ProfileInsert, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let full_name = request.full_name.as_deref().unwrap_or("").trim().to_string();
    if full_name.is_empty() {
        errors.push("full_name", MSG_FULL_NAME_REQUIRED);
    }

    let email = normalize_email(request.email.as_deref().unwrap_or(""));
    if !valid_email(&email) {
        errors.push("email", MSG_USER_EMAIL);
    }

    let designation = request
        .designation
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();
    if designation.is_empty() {
        errors.push("designation", MSG_DESIGNATION_REQUIRED);
    }

    let role = match request.role.as_deref().map(Role::parse) {
        Some(Some(role)) => role,
        // The administration form defaults the role selector to "user".
        None => Role::User,
        Some(None) => {
            errors.push("role", MSG_ROLE);
            Role::User
        }
    };

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(ToString::to_string);

    errors.into_result(ProfileInsert {
        full_name,
        email,
        phone,
        role,
        designation,
    })
}
