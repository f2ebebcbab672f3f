//! Inline form messages. Messages must be safe to render and never include
//! passwords or codes.

use super::errors::RecoveryError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// The single message a step shows below its form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl From<&RecoveryError> for FormMessage {
    fn from(err: &RecoveryError) -> Self {
        FormMessage::error(err.user_message())
    }
}

impl fmt::Display for FormMessage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MessageKind::Info => write!(formatter, "{}", self.text),
            MessageKind::Error => write!(formatter, "error: {}", self.text),
        }
    }
}
