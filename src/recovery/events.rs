use super::{navigation::Redirect, otp::OtpDigits, session::Step};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Upward notifications from a step to the wizard. Steps never touch the
/// session directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardEvent {
    /// The backend issued a code for this email.
    EmailAccepted(String),
    /// A cell of the OTP grid changed, or the grid was cleared.
    OtpChanged(OtpDigits),
    /// The backend accepted this code.
    OtpVerified(OtpDigits),
    Advance(Step),
    Redirect(Redirect),
}

pub type EventSender = UnboundedSender<WizardEvent>;

pub(crate) fn emit(events: &EventSender, event: WizardEvent) {
    if events.send(event).is_err() {
        debug!("wizard event dropped, wizard is gone");
    }
}
