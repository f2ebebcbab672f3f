use super::otp::OtpDigits;
use std::fmt;

/// Wizard steps in the only order they can be visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    Email,
    Otp,
    Reset,
}

impl Step {
    /// The final step of the wizard.
    pub const LAST: Step = Step::Reset;

    #[must_use]
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Email => Some(Step::Otp),
            Step::Otp => Some(Step::Reset),
            Step::Reset => None,
        }
    }

    /// 1-based position, as shown to the user.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::Email => 1,
            Step::Otp => 2,
            Step::Reset => 3,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Email => write!(formatter, "email"),
            Step::Otp => write!(formatter, "otp"),
            Step::Reset => write!(formatter, "reset"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// Target is behind or equal to the current step.
    Backward { from: Step, to: Step },
    /// Target is more than one step ahead.
    Skip { from: Step, to: Step },
    /// The email has not been set before leaving the email step.
    MissingEmail,
    /// The email was already set and cannot change.
    EmailLocked,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Backward { from, to } => {
                write!(formatter, "cannot go back from {from} to {to}")
            }
            TransitionError::Skip { from, to } => {
                write!(formatter, "cannot skip from {from} to {to}")
            }
            TransitionError::MissingEmail => write!(formatter, "email is not set"),
            TransitionError::EmailLocked => write!(formatter, "email is already set"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// State of one recovery attempt. Held in memory only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoverySession {
    email: String,
    step: Step,
    otp_digits: OtpDigits,
}

impl RecoverySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn otp_digits(&self) -> &OtpDigits {
        &self.otp_digits
    }

    /// Records the email once, while still on the email step.
    ///
    /// # Errors
    /// Returns `TransitionError::EmailLocked` if the email is already set or the
    /// session has left the email step.
    pub fn set_email(&mut self, email: &str) -> Result<(), TransitionError> {
        if !self.email.is_empty() || self.step() != Step::Email {
            return Err(TransitionError::EmailLocked);
        }
        self.email = email.to_string();
        Ok(())
    }

    pub fn set_otp_digits(&mut self, digits: OtpDigits) {
        self.otp_digits = digits;
    }

    /// Moves to `to`, which must be the immediate next step.
    ///
    /// # Errors
    /// Returns a `TransitionError` for backward moves, skips, or leaving the
    /// email step without an email.
    pub fn advance(&mut self, to: Step) -> Result<(), TransitionError> {
        let from = self.step();
        if to <= from {
            return Err(TransitionError::Backward { from, to });
        }
        if from.next() != Some(to) {
            return Err(TransitionError::Skip { from, to });
        }
        if self.email.is_empty() {
            return Err(TransitionError::MissingEmail);
        }
        self.step = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_email() {
        let session = RecoverySession::new();
        assert_eq!(session.step(), Step::Email);
        assert_eq!(session.email(), "");
        assert_eq!(session.otp_digits().filled(), 0);
    }

    #[test]
    fn advances_forward_one_step_at_a_time() {
        let mut session = RecoverySession::new();
        assert_eq!(session.set_email("a@b.com"), Ok(()));
        assert_eq!(session.advance(Step::Otp), Ok(()));
        assert_eq!(session.advance(Step::Reset), Ok(()));
        assert_eq!(session.step(), Step::Reset);
    }

    #[test]
    fn rejects_skips_and_back_moves() {
        let mut session = RecoverySession::new();
        assert_eq!(session.set_email("a@b.com"), Ok(()));
        assert_eq!(
            session.advance(Step::Reset),
            Err(TransitionError::Skip {
                from: Step::Email,
                to: Step::Reset
            })
        );
        assert_eq!(session.advance(Step::Otp), Ok(()));
        assert_eq!(
            session.advance(Step::Email),
            Err(TransitionError::Backward {
                from: Step::Otp,
                to: Step::Email
            })
        );
        assert_eq!(
            session.advance(Step::Otp),
            Err(TransitionError::Backward {
                from: Step::Otp,
                to: Step::Otp
            })
        );
    }

    #[test]
    fn email_is_required_and_immutable() {
        let mut session = RecoverySession::new();
        assert_eq!(
            session.advance(Step::Otp),
            Err(TransitionError::MissingEmail)
        );
        assert_eq!(session.set_email("a@b.com"), Ok(()));
        assert_eq!(
            session.set_email("c@d.com"),
            Err(TransitionError::EmailLocked)
        );
        assert_eq!(session.email(), "a@b.com");
    }

    #[test]
    fn step_numbers() {
        assert_eq!(Step::Email.number(), 1);
        assert_eq!(Step::Otp.number(), 2);
        assert_eq!(Step::LAST.number(), 3);
        assert_eq!(Step::LAST.next(), None);
    }
}
