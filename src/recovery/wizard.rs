//! The recovery wizard controller.
//!
//! The wizard owns the [`RecoverySession`] and the active step. Steps report
//! through an unbounded channel; the wizard applies whatever is queued after
//! each operation and [`RecoveryWizard::next_event`] waits for deferred events
//! (the delayed advance and the login redirect). Replacing the active step drops
//! its message and cancels its deferred actions.

use super::{
    email::EmailStep,
    errors::RecoveryError,
    events::{EventSender, WizardEvent},
    message::FormMessage,
    navigation::Redirect,
    otp::{Key, OtpInputError},
    reset::PasswordResetStep,
    session::{RecoverySession, Step},
    verify::OtpVerificationStep,
};
use crate::client::{config::Timings, AppConfig};
use crate::features::recovery::RecoveryApi;
use secrecy::SecretString;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, warn};

#[derive(Debug)]
pub enum ActiveStep {
    Email(EmailStep),
    Otp(OtpVerificationStep),
    Reset(PasswordResetStep),
}

impl ActiveStep {
    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        match self {
            ActiveStep::Email(step) => step.message(),
            ActiveStep::Otp(step) => step.message(),
            ActiveStep::Reset(step) => step.message(),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self {
            ActiveStep::Email(step) => step.is_busy(),
            ActiveStep::Otp(step) => step.is_busy(),
            ActiveStep::Reset(step) => step.is_busy(),
        }
    }
}

pub struct RecoveryWizard<A> {
    api: A,
    session: RecoverySession,
    active: ActiveStep,
    events: EventSender,
    receiver: UnboundedReceiver<WizardEvent>,
    timings: Timings,
    login_url: String,
    redirect: Option<Redirect>,
    redirected: bool,
}

impl<A: RecoveryApi> RecoveryWizard<A> {
    pub fn new(api: A, config: &AppConfig) -> Self {
        let (events, receiver) = unbounded_channel();

        Self {
            api,
            session: RecoverySession::new(),
            active: ActiveStep::Email(EmailStep::new(events.clone())),
            events,
            receiver,
            timings: config.timings,
            login_url: config.login_url.clone(),
            redirect: None,
            redirected: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &RecoverySession {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step()
    }

    pub fn active(&self) -> &ActiveStep {
        &self.active
    }

    /// Message of the active step, if any.
    pub fn message(&self) -> Option<&FormMessage> {
        self.active.message()
    }

    pub fn otp_step(&self) -> Option<&OtpVerificationStep> {
        match &self.active {
            ActiveStep::Otp(step) => Some(step),
            _ => None,
        }
    }

    pub fn otp_step_mut(&mut self) -> Option<&mut OtpVerificationStep> {
        match &mut self.active {
            ActiveStep::Otp(step) => Some(step),
            _ => None,
        }
    }

    pub fn reset_step(&self) -> Option<&PasswordResetStep> {
        match &self.active {
            ActiveStep::Reset(step) => Some(step),
            _ => None,
        }
    }

    /// Step 1: request a code for `email`.
    ///
    /// # Errors
    /// `Disabled` outside the email step, otherwise the step's error.
    pub async fn submit_email(&mut self, email: &str) -> Result<(), RecoveryError> {
        let ActiveStep::Email(step) = &mut self.active else {
            return Err(RecoveryError::Disabled);
        };
        let result = step.submit(&self.api, email).await;
        self.drain_events();
        result
    }

    /// Step 2: type into an OTP cell.
    ///
    /// # Errors
    /// `Disabled` outside the OTP step, otherwise the grid's rejection.
    pub fn input_otp(&mut self, index: usize, value: &str) -> Result<(), OtpInputError> {
        let ActiveStep::Otp(step) = &mut self.active else {
            return Err(OtpInputError::Disabled);
        };
        let result = step.input(index, value);
        self.drain_events();
        result
    }

    pub fn otp_key_down(&mut self, index: usize, key: Key) {
        if let ActiveStep::Otp(step) = &mut self.active {
            step.key_down(index, key);
        }
    }

    /// Step 2: verify the entered code.
    ///
    /// # Errors
    /// `Disabled` outside the OTP step, otherwise the step's error.
    pub async fn submit_otp(&mut self) -> Result<(), RecoveryError> {
        let ActiveStep::Otp(step) = &mut self.active else {
            return Err(RecoveryError::Disabled);
        };
        let result = step.submit(&self.api).await;
        self.drain_events();
        result
    }

    /// Step 2: ask for a new code.
    ///
    /// # Errors
    /// `Disabled` outside the OTP step, otherwise the step's error.
    pub async fn resend_otp(&mut self) -> Result<(), RecoveryError> {
        let ActiveStep::Otp(step) = &mut self.active else {
            return Err(RecoveryError::Disabled);
        };
        let result = step.resend(&self.api).await;
        self.drain_events();
        result
    }

    /// Step 3: submit the new password pair.
    ///
    /// # Errors
    /// `Disabled` outside the reset step, otherwise the step's error.
    pub async fn submit_new_password(
        &mut self,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<(), RecoveryError> {
        let ActiveStep::Reset(step) = &mut self.active else {
            return Err(RecoveryError::Disabled);
        };
        let result = step.submit(&self.api, new_password, confirm_password).await;
        self.drain_events();
        result
    }

    /// Whether a deferred event is scheduled or queued for the active step.
    pub fn is_waiting(&self) -> bool {
        match &self.active {
            ActiveStep::Email(_) => false,
            ActiveStep::Otp(step) => step.is_verified(),
            ActiveStep::Reset(step) => step.is_completed() && !self.redirected,
        }
    }

    /// Applies the next event, waiting for a deferred one if the active step
    /// has scheduled it. Returns `None` when nothing is queued or pending.
    pub async fn next_event(&mut self) -> Option<WizardEvent> {
        let event = match self.receiver.try_recv() {
            Ok(event) => event,
            Err(_) if self.is_waiting() => self.receiver.recv().await?,
            Err(_) => return None,
        };
        self.apply(event.clone());
        Some(event)
    }

    /// Applies every queued event without waiting. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }

    /// Hands out the login redirect once.
    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.redirect.take()
    }

    #[cfg(test)]
    fn weak_events(&self) -> tokio::sync::mpsc::WeakUnboundedSender<WizardEvent> {
        self.events.downgrade()
    }

    fn apply(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::EmailAccepted(email) => {
                if let Err(err) = self.session.set_email(&email) {
                    warn!("ignored email update: {err}");
                }
            }
            WizardEvent::OtpChanged(digits) | WizardEvent::OtpVerified(digits) => {
                self.session.set_otp_digits(digits);
            }
            WizardEvent::Advance(to) => self.transition(to),
            WizardEvent::Redirect(redirect) => {
                debug!(redirect_to = redirect.target(), "recovery finished, redirecting");
                self.redirect = Some(redirect);
                self.redirected = true;
            }
        }
    }

    fn transition(&mut self, to: Step) {
        if let Err(err) = self.session.advance(to) {
            warn!("ignored step transition: {err}");
            return;
        }
        debug!(step = %to, "recovery step changed");

        let events = self.events.clone();
        self.active = match to {
            Step::Email => ActiveStep::Email(EmailStep::new(events)),
            Step::Otp => ActiveStep::Otp(OtpVerificationStep::new(
                self.session.email(),
                events,
                self.timings.verify_delay,
            )),
            Step::Reset => ActiveStep::Reset(PasswordResetStep::new(
                self.session.email(),
                self.session.otp_digits().clone(),
                events,
                self.timings.redirect_delay,
                self.login_url.clone(),
            )),
        };
    }
}
