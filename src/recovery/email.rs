//! Step 1: ask the backend to issue a code for an email address.

use super::{
    errors::{check_response, RecoveryError, ValidationError},
    events::{emit, EventSender, WizardEvent},
    message::FormMessage,
    session::Step,
};
use crate::features::recovery::{ForgotPasswordRequest, RecoveryApi};
use regex::Regex;
use tracing::{debug, instrument};

const SEND_OTP_FAILED: &str = "Failed to send OTP.";
const OTP_SENT: &str = "OTP sent to your email.";

/// Same bar as a browser's `type=email` + `required`: something on both sides of one `@`.
pub(crate) fn validate_email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !Regex::new(r"^[^@\s]+@[^@\s]+$").is_ok_and(|re| re.is_match(email)) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

#[derive(Debug)]
pub struct EmailStep {
    events: EventSender,
    busy: bool,
    message: Option<FormMessage>,
}

impl EmailStep {
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            busy: false,
            message: None,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// Requests a code for `email`. On success the wizard receives the email and
    /// an advance to the OTP step.
    ///
    /// # Errors
    /// Returns the `RecoveryError` that was also put into the step message.
    #[instrument(skip_all)]
    pub async fn submit<A: RecoveryApi>(
        &mut self,
        api: &A,
        email: &str,
    ) -> Result<(), RecoveryError> {
        if self.busy {
            return Err(RecoveryError::Disabled);
        }
        self.message = None;

        let email = match validate_email(email) {
            Ok(email) => email,
            Err(err) => return Err(self.fail(err.into())),
        };

        self.busy = true;
        let result = api
            .request_otp(&ForgotPasswordRequest {
                email: email.clone(),
            })
            .await;
        self.busy = false;

        match check_response(result, SEND_OTP_FAILED) {
            Ok(response) => {
                debug!("recovery code issued");
                self.message = Some(FormMessage::info(response.message_or(OTP_SENT)));
                emit(&self.events, WizardEvent::EmailAccepted(email));
                emit(&self.events, WizardEvent::Advance(Step::Otp));
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
