use crate::{
    api,
    api::handlers::auth::AuthConfig,
    cli::{actions::Action, globals::GlobalArgs},
    provider,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

/// Execute the server action.
///
/// # Errors
///
/// Returns an error if the provider client cannot be built or the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            provider_url,
            provider_anon_key,
            provider_service_key,
            frontend_base_url,
            otp_flow_ttl_seconds,
        } => {
            let mut globals = GlobalArgs::new(provider_url, SecretString::from(provider_anon_key));
            if let Some(service_key) = provider_service_key {
                globals = globals.with_service_key(SecretString::from(service_key));
            }

            debug!("Global args: {:?}", globals);

            let client = provider::Client::new(&globals)?;

            let config =
                AuthConfig::new(frontend_base_url).with_flow_ttl_seconds(otp_flow_ttl_seconds);

            api::new(port, client, config).await?;
        }
    }

    Ok(())
}
