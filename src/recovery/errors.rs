use crate::client::AppError;
use crate::features::recovery::ApiResponse;
use std::fmt;
use tracing::{error, warn};

/// Shown for every transport failure; details go to the logs only.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Client-side checks that run before any request is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    EmailRequired,
    InvalidEmail,
    IncompleteCode,
    PasswordMismatch,
    PasswordTooShort,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationError::EmailRequired => "Email is required.",
            ValidationError::InvalidEmail => "Please enter a valid email address.",
            ValidationError::IncompleteCode => "Please enter the complete 6-digit code.",
            ValidationError::PasswordMismatch => "Passwords do not match.",
            ValidationError::PasswordTooShort => "Password must be at least 6 characters long.",
        };
        formatter.write_str(message)
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of a failed step operation. Every variant is recovered at the step
/// boundary; the step keeps its state and shows [`RecoveryError::user_message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryError {
    Validation(ValidationError),
    /// The backend answered with `success: false`.
    Server(String),
    Transport(AppError),
    /// The controls are disabled (request in flight or step already done).
    Disabled,
}

impl RecoveryError {
    /// Text suitable for the step's inline message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RecoveryError::Validation(err) => err.to_string(),
            RecoveryError::Server(message) => message.clone(),
            RecoveryError::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            RecoveryError::Disabled => "Please wait for the current request to finish.".to_string(),
        }
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Validation(err) => write!(formatter, "Validation error: {err}"),
            RecoveryError::Server(message) => write!(formatter, "Server error: {message}"),
            RecoveryError::Transport(err) => write!(formatter, "Transport error: {err}"),
            RecoveryError::Disabled => write!(formatter, "Form is disabled"),
        }
    }
}

impl std::error::Error for RecoveryError {}

impl From<ValidationError> for RecoveryError {
    fn from(err: ValidationError) -> Self {
        RecoveryError::Validation(err)
    }
}

impl From<AppError> for RecoveryError {
    fn from(err: AppError) -> Self {
        RecoveryError::Transport(err)
    }
}

/// Folds an API call result into the step taxonomy: a successful envelope is
/// returned, `success: false` becomes `Server` with the server message or the
/// fallback, and transport failures are logged and passed through.
pub(crate) fn check_response(
    result: Result<ApiResponse, AppError>,
    fallback: &str,
) -> Result<ApiResponse, RecoveryError> {
    match result {
        Ok(response) if response.success => Ok(response),
        Ok(response) => Err(RecoveryError::Server(response.message_or(fallback))),
        Err(err) => {
            if err.is_retryable() {
                warn!(status = err.status(), "recovery request failed: {err}");
            } else {
                error!(status = err.status(), "recovery request rejected: {err}");
            }
            Err(RecoveryError::Transport(err))
        }
    }
}
