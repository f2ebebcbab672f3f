//! JSON-over-HTTP transport for the recovery endpoints. Every call is a POST
//! whose reply is a `{ success, message }` envelope; anything else is mapped to
//! an `AppError` with a collapsed, length-capped body.

use super::{config::AppConfig, errors::AppError};
use crate::APP_USER_AGENT;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::to_string;
use tracing::debug;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Thin wrapper around a shared `reqwest::Client` bound to one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds the client from config.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// The body is decoded whatever the status code is, because the API reports
    /// failures inside the envelope. Only undecodable bodies become errors.
    ///
    /// # Errors
    /// Returns an `AppError` on encoding, network or decoding failures.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = endpoint_url(&self.base_url, path);
        let payload = to_string(body)
            .map_err(|err| AppError::Encode(format!("Failed to encode request: {err}")))?;

        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| transport_error(&err))?;

        decode_envelope(response).await
    }
}

/// Joins a validated base URL (no trailing `/`) and an endpoint path.
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/{}", path.trim().trim_start_matches('/'))
}

/// Classifies a failed send. Connection failures name the endpoint so the log
/// line says which backend was down.
fn transport_error(err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Encode(format!("Failed to build request: {err}"))
    } else if err.is_connect() {
        let target = err.url().map_or_else(String::new, |url| format!(" {url}"));
        AppError::Network(format!("Cannot connect to{target}: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Decodes the recovery envelope. A 2xx body that does not decode is a
/// `Decode` error; any other undecodable body is kept as a sanitized `Http` error.
async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await.map_err(|err| transport_error(&err))?;

    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(err) if status.is_success() => {
            Err(AppError::Decode(format!("Failed to decode response: {err}")))
        }
        Err(_) => Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        }),
    }
}

/// Collapses whitespace (error pages are often multi-line HTML) and caps the
/// length before the text can reach a log or the terminal.
fn sanitize_body(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "Empty response body.".to_string()
    } else {
        collapsed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_base_and_path() {
        assert_eq!(
            endpoint_url("http://localhost:5000", "/api/auth/verify-otp"),
            "http://localhost:5000/api/auth/verify-otp"
        );
        assert_eq!(
            endpoint_url("https://permesi.dev/gateway", "api/auth/reset-password"),
            "https://permesi.dev/gateway/api/auth/reset-password"
        );
    }

    #[test]
    fn sanitize_body_collapses_and_truncates() {
        assert_eq!(sanitize_body("   \n"), "Empty response body.");
        assert_eq!(
            sanitize_body("<html>\n  <h1>502</h1>\n  Bad Gateway\n</html>"),
            "<html> <h1>502</h1> Bad Gateway </html>"
        );

        let long = "x".repeat(MAX_ERROR_CHARS + 50);
        assert_eq!(sanitize_body(&long).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn client_keeps_base_url() {
        let config = AppConfig::default();
        let client = ApiClient::new(&config);
        assert!(client.is_ok());
        if let Ok(client) = client {
            assert_eq!(client.base_url(), "http://localhost:5000");
        }
    }
}
