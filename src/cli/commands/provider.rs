use clap::{Arg, Command};

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_PROVIDER_ANON_KEY: &str = "provider-anon-key";
pub const ARG_PROVIDER_SERVICE_KEY: &str = "provider-service-key";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Base URL of the authentication/database provider, example: https://project.supabase.co")
                .env("ROLLCALL_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_ANON_KEY)
                .long(ARG_PROVIDER_ANON_KEY)
                .help("Publishable (anon) API key used for auth endpoints")
                .env("ROLLCALL_PROVIDER_ANON_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_SERVICE_KEY)
                .long(ARG_PROVIDER_SERVICE_KEY)
                .help("Service-role API key used for table writes (falls back to the anon key)")
                .env("ROLLCALL_PROVIDER_SERVICE_KEY"),
        )
}
