//! In-memory `RecoveryApi` double for unit tests.

use crate::client::AppError;
use crate::features::recovery::{
    ApiResponse, ForgotPasswordRequest, RecoveryApi, ResetPasswordRequest, VerifyOtpRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    RequestOtp(ForgotPasswordRequest),
    VerifyOtp(VerifyOtpRequest),
    ResetPassword(ResetPasswordRequest),
}

type Replies = Mutex<VecDeque<Result<ApiResponse, AppError>>>;

/// Records every call and answers from per-endpoint queues. An empty queue
/// answers `{ success: true }`.
#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<Call>>,
    request_otp: Replies,
    verify_otp: Replies,
    reset_password: Replies,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_request_otp(self, reply: Result<ApiResponse, AppError>) -> Self {
        self.request_otp.lock().expect("mock lock").push_back(reply);
        self
    }

    pub(crate) fn reply_verify_otp(self, reply: Result<ApiResponse, AppError>) -> Self {
        self.verify_otp.lock().expect("mock lock").push_back(reply);
        self
    }

    pub(crate) fn reply_reset_password(self, reply: Result<ApiResponse, AppError>) -> Self {
        self.reset_password.lock().expect("mock lock").push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mock lock").clone()
    }

    fn answer(&self, call: Call, replies: &Replies) -> Result<ApiResponse, AppError> {
        self.calls.lock().expect("mock lock").push(call);
        replies
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(None)))
    }
}

impl RecoveryApi for MockApi {
    async fn request_otp(&self, request: &ForgotPasswordRequest) -> Result<ApiResponse, AppError> {
        self.answer(Call::RequestOtp(request.clone()), &self.request_otp)
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<ApiResponse, AppError> {
        self.answer(Call::VerifyOtp(request.clone()), &self.verify_otp)
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ApiResponse, AppError> {
        self.answer(Call::ResetPassword(request.clone()), &self.reset_password)
    }
}
