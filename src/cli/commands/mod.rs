pub mod logging;
pub mod provider;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_OTP_FLOW_TTL: &str = "otp-flow-ttl";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("rollcall")
        .about("User management and authentication service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("ROLLCALL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Origin of the web frontend, used for CORS and redirect targets")
                .default_value("http://localhost:3000")
                .env("ROLLCALL_FRONTEND_BASE_URL"),
        )
        .arg(
            Arg::new(ARG_OTP_FLOW_TTL)
                .long(ARG_OTP_FLOW_TTL)
                .help("Seconds a pending phone-verification flow stays valid")
                .default_value("300")
                .env("ROLLCALL_OTP_FLOW_TTL")
                .value_parser(clap::value_parser!(u64)),
        );

    let command = provider::with_args(command);
    logging::with_args(command)
}
