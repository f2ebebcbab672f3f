//! # Permesi Recovery (password recovery client)
//!
//! `permesi-recovery` drives the forgot-password flow of the authentication API:
//!
//! 1. **Email:** the user submits an address and the API issues a one-time code
//!    (`POST /api/auth/forgot-password`).
//! 2. **Code:** the 6-digit code is typed into a grid of single-digit cells and
//!    verified (`POST /api/auth/verify-otp`). The code can be re-issued at any time
//!    from this step.
//! 3. **Reset:** a new password is validated locally and submitted together with
//!    the verified code (`POST /api/auth/reset-password`), then the user is sent
//!    back to login with a one-shot message.
//!
//! The wizard is forward-only. State lives in a [`recovery::RecoverySession`]
//! owned by the [`recovery::RecoveryWizard`]; steps report changes through
//! [`recovery::WizardEvent`]s instead of mutating the session.
//!
//! Passwords and codes are never logged.

pub mod cli;
pub mod client;
pub mod features;
pub mod recovery;

pub const GIT_COMMIT_HASH: &str = match option_env!("PERMESI_RECOVERY_GIT_SHA") {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
