//! Client configuration: the API base URL, an optional request timeout and the
//! pacing delays of the recovery wizard. Values come from CLI flags or their
//! `PERMESI_*` environment fallbacks. Configuration values are public; do not
//! store secrets here.

use super::errors::AppError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOGIN_URL: &str = "/login";

/// Pause between a verified code and the password form.
pub const DEFAULT_VERIFY_DELAY: Duration = Duration::from_secs(1);
/// Pause between a successful reset and the redirect to login.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// `None` leaves requests unbounded, the connection timeout of the platform applies.
    pub request_timeout: Option<Duration>,
    pub login_url: String,
    pub timings: Timings,
}

/// Fixed delays used by the wizard for UX pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub verify_delay: Duration,
    pub redirect_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            verify_delay: DEFAULT_VERIFY_DELAY,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            timings: Timings::default(),
        }
    }
}

impl AppConfig {
    /// Builds a config for the given base URL, keeping defaults for the rest.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the URL is not an absolute `http(s)` URL.
    pub fn new(api_base_url: &str) -> Result<Self, AppError> {
        let api_base_url = match normalize_value(api_base_url) {
            Some(value) => validate_base_url(&value)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        Ok(Self {
            api_base_url,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout.filter(|value| !value.is_zero());
        self
    }

    #[must_use]
    pub fn with_login_url(mut self, login_url: &str) -> Self {
        if let Some(value) = normalize_value(login_url) {
            self.login_url = value;
        }
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }
}

fn validate_base_url(value: &str) -> Result<String, AppError> {
    let url = Url::parse(value)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {value}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        scheme => Err(AppError::Config(format!(
            "Unsupported API base URL scheme: {scheme}"
        ))),
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
