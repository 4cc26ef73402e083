//! Auth endpoints: login, signup, OTP send/verify, session data, lifecycle
//! events, and logout.
//!
//! Handlers validate first, talk to the provider second, and publish every
//! session change on the shared event channel. Provider failures surface to
//! the client as-is; none are swallowed.

pub mod flow;
pub mod login;
pub mod otp;
pub mod session;
pub mod signup;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use state::{AuthChange, AuthConfig, AuthSnapshot, AuthState, SessionEvents};

/// Client-side destinations handed back in `redirect_to`.
pub(crate) const ROUTE_HOME: &str = "/";
pub(crate) const ROUTE_CHECK_EMAIL: &str = "/auth/check-email";
pub(crate) const ROUTE_VERIFY_OTP_LOGIN: &str = "/auth/verify-otp?type=login";
pub(crate) const ROUTE_VERIFY_OTP_SIGNUP: &str = "/auth/verify-otp?type=signup";
