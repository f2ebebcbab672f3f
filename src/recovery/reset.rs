//! Step 3: choose a new password and finish the reset.

use super::{
    deferred::Deferred,
    errors::{check_response, RecoveryError, ValidationError},
    events::{EventSender, WizardEvent},
    message::FormMessage,
    navigation::Redirect,
    otp::OtpDigits,
};
use crate::features::recovery::{RecoveryApi, ResetPasswordRequest};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

/// The only password rule enforced client-side.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const RESET_FAILED: &str = "Failed to reset password.";
const RESET_DONE: &str = "Password reset successfully. Redirecting to login...";
const LOGIN_FLASH: &str = "Password reset successful. Please log in with your new password.";

/// Mismatch is checked first, then length (in characters).
pub(crate) fn validate_passwords(
    new_password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), ValidationError> {
    let new_password = new_password.expose_secret();
    if new_password != confirm_password.expose_secret() {
        return Err(ValidationError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

#[derive(Debug)]
pub struct PasswordResetStep {
    email: String,
    otp_digits: OtpDigits,
    events: EventSender,
    redirect_delay: Duration,
    login_url: String,
    busy: bool,
    completed: bool,
    message: Option<FormMessage>,
    pending_redirect: Option<Deferred>,
}

impl PasswordResetStep {
    pub fn new(
        email: impl Into<String>,
        otp_digits: OtpDigits,
        events: EventSender,
        redirect_delay: Duration,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            otp_digits,
            events,
            redirect_delay,
            login_url: login_url.into(),
            busy: false,
            completed: false,
            message: None,
            pending_redirect: None,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn otp_digits(&self) -> &OtpDigits {
        &self.otp_digits
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// Validates and submits the new password. On success the redirect to login
    /// is reported after the configured delay.
    ///
    /// # Errors
    /// Returns the `RecoveryError` that was also put into the step message.
    #[instrument(skip_all)]
    pub async fn submit<A: RecoveryApi>(
        &mut self,
        api: &A,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<(), RecoveryError> {
        if self.busy || self.completed {
            return Err(RecoveryError::Disabled);
        }
        self.message = None;

        if let Err(err) = validate_passwords(new_password, confirm_password) {
            return Err(self.fail(err.into()));
        }

        self.busy = true;
        let request = ResetPasswordRequest {
            email: self.email.clone(),
            otp: self.otp_digits.code(),
            new_password: new_password.expose_secret().to_string(),
        };
        let result = api.reset_password(&request).await;
        self.busy = false;

        match check_response(result, RESET_FAILED) {
            Ok(_) => {
                debug!("password reset accepted");
                self.completed = true;
                self.message = Some(FormMessage::info(RESET_DONE));
                let redirect =
                    Redirect::new(self.login_url.clone(), Some(LOGIN_FLASH.to_string()));
                self.pending_redirect = Some(Deferred::send_after(
                    self.redirect_delay,
                    self.events.clone(),
                    WizardEvent::Redirect(redirect),
                ));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: RecoveryError) -> RecoveryError {
        self.message = Some(FormMessage::from(&err));
        err
    }
}
