//! Client wrappers for the recovery endpoints. The `RecoveryApi` trait is the
//! seam between the wizard and the network so steps can be driven against any
//! backend; `ApiClient` is the HTTP implementation.

use crate::{
    client::{ApiClient, AppError},
    features::recovery::types::{
        ApiResponse, ForgotPasswordRequest, ResetPasswordRequest, VerifyOtpRequest,
    },
};
use std::future::Future;

pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const VERIFY_OTP_PATH: &str = "/api/auth/verify-otp";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";

/// Backend operations used by the recovery wizard.
///
/// `Ok` means the backend answered with a decodable envelope, whatever its
/// `success` flag says. `Err` is reserved for transport failures.
pub trait RecoveryApi: Send + Sync {
    /// Issues (or re-issues) a one-time code for the email.
    fn request_otp(
        &self,
        request: &ForgotPasswordRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send;

    /// Checks a one-time code for the email.
    fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send;

    /// Sets a new password, authorized by the verified code.
    fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send;
}

impl RecoveryApi for ApiClient {
    async fn request_otp(&self, request: &ForgotPasswordRequest) -> Result<ApiResponse, AppError> {
        self.post_json(FORGOT_PASSWORD_PATH, request).await
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<ApiResponse, AppError> {
        self.post_json(VERIFY_OTP_PATH, request).await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ApiResponse, AppError> {
        self.post_json(RESET_PASSWORD_PATH, request).await
    }
}
