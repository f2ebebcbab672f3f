//! Maps validated CLI arguments to the recovery action and its client configuration.

use crate::cli::actions::{recover::Args, Action};
use crate::cli::commands::{
    ARG_API_BASE_URL, ARG_LOGIN_URL, ARG_REDIRECT_DELAY_MS, ARG_TIMEOUT, ARG_VERIFY_DELAY_MS,
};
use crate::client::{config::Timings, AppConfig};
use anyhow::{Context, Result};
use std::time::Duration;

/// Map validated CLI matches to the recovery action.
///
/// # Errors
/// Returns an error if the API base URL is not an absolute http(s) URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let api_base_url = matches
        .get_one::<String>(ARG_API_BASE_URL)
        .map_or("", String::as_str);

    let timings = Timings {
        verify_delay: millis(matches, ARG_VERIFY_DELAY_MS)
            .unwrap_or(crate::client::config::DEFAULT_VERIFY_DELAY),
        redirect_delay: millis(matches, ARG_REDIRECT_DELAY_MS)
            .unwrap_or(crate::client::config::DEFAULT_REDIRECT_DELAY),
    };

    let config = AppConfig::new(api_base_url)
        .context("invalid PERMESI_API_BASE_URL")?
        .with_request_timeout(
            matches
                .get_one::<u64>(ARG_TIMEOUT)
                .copied()
                .map(Duration::from_secs),
        )
        .with_login_url(
            matches
                .get_one::<String>(ARG_LOGIN_URL)
                .map_or("", String::as_str),
        )
        .with_timings(timings);

    Ok(Action::Recover(Args { config }))
}

fn millis(matches: &clap::ArgMatches, id: &str) -> Option<Duration> {
    matches
        .get_one::<u64>(id)
        .copied()
        .map(Duration::from_millis)
}
