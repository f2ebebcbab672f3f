//! Password recovery wizard: a forward-only sequence of email entry, code
//! verification and password reset.
//!
//! Steps are plain structs driven through [`RecoveryWizard`]. They validate
//! input, call the [`RecoveryApi`](crate::features::recovery::RecoveryApi), set
//! their inline [`FormMessage`] and report upward with [`WizardEvent`]s. Errors
//! never leave a step in a broken state; the wizard stays where it was.

pub mod deferred;
pub mod email;
pub mod errors;
pub mod events;
pub mod focus;
pub mod message;
pub mod navigation;
pub mod otp;
pub mod reset;
pub mod session;
pub mod verify;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use deferred::Deferred;
pub use errors::{RecoveryError, ValidationError, NETWORK_ERROR_MESSAGE};
pub use events::WizardEvent;
pub use focus::{FocusHandle, FocusRegistry};
pub use message::{FormMessage, MessageKind};
pub use navigation::Redirect;
pub use otp::{Key, OtpDigits, OtpGrid, OtpInputError, OTP_LENGTH};
pub use reset::MIN_PASSWORD_LENGTH;
pub use session::{RecoverySession, Step, TransitionError};
pub use wizard::{ActiveStep, RecoveryWizard};
