//! Password recovery endpoints: OTP issuance, OTP verification and password reset.

pub mod client;
pub mod types;

pub use client::RecoveryApi;
pub use types::{ApiResponse, ForgotPasswordRequest, ResetPasswordRequest, VerifyOtpRequest};
