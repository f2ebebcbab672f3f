use std::fmt;

/// Failures below the recovery envelope: the request never produced a
/// `{ success, message }` body the wizard can read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// Client setup was rejected (bad base URL, HTTP client build failure).
    Config(String),
    /// The recovery API could not be reached.
    Network(String),
    Timeout(String),
    /// A non-JSON reply, typically a proxy or server error page.
    Http { status: u16, message: String },
    /// A 2xx reply that is not a recovery envelope.
    Decode(String),
    /// The request body could not be produced.
    Encode(String),
}

impl AppError {
    /// HTTP status of the reply, when one arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether sending the same request again may succeed. Used to pick the
    /// log level; the wizard always lets the user retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) | AppError::Timeout(_) => true,
            AppError::Http { status, .. } => *status >= 500 || *status == 429,
            AppError::Config(_) | AppError::Decode(_) | AppError::Encode(_) => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "invalid client setup: {message}"),
            AppError::Network(message) => {
                write!(formatter, "recovery API unreachable: {message}")
            }
            AppError::Timeout(message) => write!(formatter, "recovery API timed out: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "recovery API answered {status} without an envelope: {message}")
            }
            AppError::Decode(message) => {
                write!(formatter, "unreadable recovery envelope: {message}")
            }
            AppError::Encode(message) => {
                write!(formatter, "could not encode recovery request: {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn display_names_the_recovery_api() {
        let err = AppError::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "recovery API answered 502 without an envelope: Bad Gateway"
        );
        assert_eq!(
            AppError::Network("connection refused".to_string()).to_string(),
            "recovery API unreachable: connection refused"
        );
        assert_eq!(
            AppError::Decode("expected value".to_string()).to_string(),
            "unreadable recovery envelope: expected value"
        );
    }

    #[test]
    fn status_only_for_http_replies() {
        let err = AppError::Http {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(AppError::Timeout("slow".to_string()).status(), None);
    }

    #[test]
    fn retryable_covers_transient_failures() {
        assert!(AppError::Network("refused".to_string()).is_retryable());
        assert!(AppError::Timeout("slow".to_string()).is_retryable());
        assert!(AppError::Http {
            status: 500,
            message: "boom".to_string()
        }
        .is_retryable());
        assert!(!AppError::Http {
            status: 404,
            message: "missing".to_string()
        }
        .is_retryable());
        assert!(!AppError::Decode("eof".to_string()).is_retryable());
        assert!(!AppError::Config("bad url".to_string()).is_retryable());
    }
}
