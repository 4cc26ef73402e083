//! # Rollcall
//!
//! `rollcall` is the backend for a small user-management portal. It exposes the
//! portal's form submissions as HTTP endpoints and delegates every meaningful
//! operation to an external authentication/database provider: credential
//! storage, session issuance, OTP delivery, and the user-profile table are all
//! owned by the provider.
//!
//! ## Authentication flows
//!
//! - **Email + password**: sign-in and sign-up against the provider's
//!   `/auth/v1` endpoints. Email sign-up redirects the client to a
//!   check-your-email page.
//! - **Phone + OTP**: requesting a code opens a server-side verification flow
//!   (login or signup) identified by a ULID; the flow carries the pending phone
//!   number and expires after a configurable TTL. Verifying the 6-digit code
//!   consumes the flow and redirects to the dashboard (login) or onboarding
//!   (signup).
//!
//! ## Sessions
//!
//! Sessions are opaque provider-issued objects. A single session manager owns
//! the current session as a queryable value and fans out auth-state changes
//! (signed-in, signed-out, OTP-verified) over a watch channel that clients
//! observe through a long-poll endpoint.
//!
//! Provider failures are surfaced verbatim as opaque error strings; invalid
//! credentials and provider outages are intentionally indistinguishable.

pub mod api;
pub mod cli;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
