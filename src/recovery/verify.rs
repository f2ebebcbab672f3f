//! Step 2: enter and verify the 6-digit code, or ask for a new one.
//!
//! After a successful verification the grid stays disabled and the advance to
//! the reset step is scheduled as a [`Deferred`], so it dies with the step.

use super::{
    deferred::Deferred,
    errors::{check_response, RecoveryError, ValidationError},
    events::{emit, EventSender, WizardEvent},
    focus::FocusHandle,
    message::FormMessage,
    otp::{Key, OtpDigits, OtpGrid, OtpInputError},
    session::Step,
};
use crate::features::recovery::{ForgotPasswordRequest, RecoveryApi, VerifyOtpRequest};
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument};

const INVALID_OTP: &str = "Invalid OTP. Please try again.";
const OTP_VERIFIED: &str = "OTP verified successfully.";
const RESEND_FAILED: &str = "Failed to resend code.";
const OTP_RESENT: &str = "A new code has been sent to your email.";

#[derive(Debug)]
pub struct OtpVerificationStep {
    email: String,
    grid: OtpGrid,
    events: EventSender,
    advance_delay: Duration,
    busy: bool,
    verified: bool,
    message: Option<FormMessage>,
    pending_advance: Option<Deferred>,
}

impl OtpVerificationStep {
    /// Builds the step and focuses the first cell.
    pub fn new(email: impl Into<String>, events: EventSender, advance_delay: Duration) -> Self {
        let mut grid = OtpGrid::new();
        grid.mount();

        Self {
            email: email.into(),
            grid,
            events,
            advance_delay,
            busy: false,
            verified: false,
            message: None,
            pending_advance: None,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn grid(&self) -> &OtpGrid {
        &self.grid
    }

    #[must_use]
    pub fn digits(&self) -> &OtpDigits {
        self.grid.digits()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn register_cell(&mut self, index: usize, handle: Arc<dyn FocusHandle>) {
        self.grid.register_cell(index, handle);
    }

    pub fn unregister_cell(&mut self, index: usize) {
        self.grid.unregister_cell(index);
    }

    /// Types `value` into cell `index` and reports the new digits.
    ///
    /// # Errors
    /// Returns the grid's rejection; nothing is reported in that case.
    pub fn input(&mut self, index: usize, value: &str) -> Result<(), OtpInputError> {
        let digits = self.grid.input(index, value)?;
        emit(&self.events, WizardEvent::OtpChanged(digits));
        Ok(())
    }

    pub fn key_down(&mut self, index: usize, key: Key) {
        self.grid.key_down(index, key);
    }

    /// Verifies the entered code.
    ///
    /// # Errors
    /// Returns the `RecoveryError` that was also put into the step message.
    /// `Disabled` leaves the message untouched.
    #[instrument(skip_all)]
    pub async fn submit<A: RecoveryApi>(&mut self, api: &A) -> Result<(), RecoveryError> {
        if self.busy || self.verified {
            return Err(RecoveryError::Disabled);
        }
        self.message = None;

        let digits = self.grid.digits().clone();
        if !digits.is_complete() {
            return Err(self.fail(ValidationError::IncompleteCode.into()));
        }

        self.set_busy(true);
        let request = VerifyOtpRequest {
            email: self.email.clone(),
            otp: digits.code(),
        };
        let result = api.verify_otp(&request).await;

        match check_response(result, INVALID_OTP) {
            Ok(response) => {
                debug!("recovery code verified");
                self.verified = true;
                self.set_busy(false);
                self.message = Some(FormMessage::info(response.message_or(OTP_VERIFIED)));
                emit(&self.events, WizardEvent::OtpVerified(digits));
                self.pending_advance = Some(Deferred::send_after(
                    self.advance_delay,
                    self.events.clone(),
                    WizardEvent::Advance(Step::Reset),
                ));
                Ok(())
            }
            Err(err) => {
                self.set_busy(false);
                Err(self.fail(err))
            }
        }
    }

    /// Asks the backend to issue a new code. Sent immediately, there is no
    /// cooldown on this side.
    ///
    /// # Errors
    /// Returns the `RecoveryError` that was also put into the step message.
    #[instrument(skip_all)]
    pub async fn resend<A: RecoveryApi>(&mut self, api: &A) -> Result<(), RecoveryError> {
        if self.busy || self.verified {
            return Err(RecoveryError::Disabled);
        }
        self.message = None;

        self.set_busy(true);
        let result = api
            .request_otp(&ForgotPasswordRequest {
                email: self.email.clone(),
            })
            .await;
        self.set_busy(false);

        match check_response(result, RESEND_FAILED) {
            Ok(response) => {
                debug!("recovery code re-issued");
                let digits = self.grid.clear();
                emit(&self.events, WizardEvent::OtpChanged(digits));
                self.message = Some(FormMessage::info(response.message_or(OTP_RESENT)));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.grid.set_disabled(busy || self.verified);
    }

    fn fail(&mut self, err: RecoveryError) -> RecoveryError {
        self.message = Some(FormMessage::from(&err));
        err
    }
}
