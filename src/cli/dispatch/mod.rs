use crate::cli::{
    actions::Action,
    commands::{
        provider::{ARG_PROVIDER_ANON_KEY, ARG_PROVIDER_SERVICE_KEY, ARG_PROVIDER_URL},
        ARG_FRONTEND_BASE_URL, ARG_OTP_FLOW_TTL, ARG_PORT,
    },
};
use anyhow::{anyhow, Result};

/// Turn parsed CLI matches into an executable action.
///
/// # Errors
///
/// Returns an error if a required argument is missing
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let required = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .cloned()
            .ok_or_else(|| anyhow!("missing required argument: --{name}"))
    };

    Ok(Action::Server {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        provider_url: required(ARG_PROVIDER_URL)?,
        provider_anon_key: required(ARG_PROVIDER_ANON_KEY)?,
        provider_service_key: matches.get_one::<String>(ARG_PROVIDER_SERVICE_KEY).cloned(),
        frontend_base_url: required(ARG_FRONTEND_BASE_URL)?,
        otp_flow_ttl_seconds: matches
            .get_one::<u64>(ARG_OTP_FLOW_TTL)
            .copied()
            .unwrap_or(300),
    })
}
