//! Request and response types for the recovery endpoints. These payloads carry
//! one-time codes and new passwords, so they must never be logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl fmt::Debug for VerifyOtpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOtpRequest")
            .field("email", &self.email)
            .field("otp", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("email", &self.email)
            .field("otp", &"[redacted]")
            .field("new_password", &"[redacted]")
            .finish()
    }
}

/// Envelope returned by every recovery endpoint: `{ success, message }`.
///
/// A missing `success` reads as `false`. `message` is kept loosely typed so a
/// non-string value degrades to "no message" instead of a decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(|text| Value::String(text.to_string())),
        }
    }

    #[must_use]
    pub fn failure(message: Option<&str>) -> Self {
        Self {
            success: false,
            message: message.map(|text| Value::String(text.to_string())),
        }
    }

    /// Server-supplied message, if it is a non-blank string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }
}
