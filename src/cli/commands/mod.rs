pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_VERIFY_DELAY_MS: &str = "verify-delay-ms";
pub const ARG_REDIRECT_DELAY_MS: &str = "redirect-delay-ms";
pub const ARG_LOGIN_URL: &str = "login-url";

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

    let command = Command::new("permesi-recovery")
        .about("Recover a Permesi account password")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .short('u')
                .long(ARG_API_BASE_URL)
                .help("Base URL of the authentication API")
                .default_value(crate::client::config::DEFAULT_API_BASE_URL)
                .env("PERMESI_API_BASE_URL"),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds (default: no timeout)")
                .env("PERMESI_REQUEST_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_VERIFY_DELAY_MS)
                .long(ARG_VERIFY_DELAY_MS)
                .help("Pause in milliseconds between a verified code and the password form")
                .default_value("1000")
                .env("PERMESI_VERIFY_DELAY_MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_REDIRECT_DELAY_MS)
                .long(ARG_REDIRECT_DELAY_MS)
                .help("Pause in milliseconds between a successful reset and the login redirect")
                .default_value("2000")
                .env("PERMESI_REDIRECT_DELAY_MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_LOGIN_URL)
                .long(ARG_LOGIN_URL)
                .help("Where to send the user once the password is reset")
                .default_value(crate::client::config::DEFAULT_LOGIN_URL)
                .env("PERMESI_LOGIN_URL"),
        );

    logging::with_args(command)
}
