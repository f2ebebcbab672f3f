//! Terminal front end for the recovery wizard.
//!
//! Prompts go to stdout and answers are read line by line from stdin. In the
//! code step every line types digits starting at the focused cell, `-` acts as
//! backspace, `resend` asks for a new code and an empty line submits the code.

use crate::client::{ApiClient, AppConfig};
use crate::features::recovery::RecoveryApi;
use crate::recovery::{Key, OtpGrid, Redirect, RecoveryWizard, Step, OTP_LENGTH};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{debug, info};

const RESEND_COMMAND: &str = "resend";
const BACKSPACE: char = '-';

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

/// Execute the recover action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the terminal closes mid-flow.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        api_base_url = %args.config.api_base_url,
        login_url = %args.config.login_url,
        timeout = ?args.config.request_timeout,
        "starting password recovery"
    );

    let api = ApiClient::new(&args.config).context("failed to build HTTP client")?;
    let mut wizard = RecoveryWizard::new(api, &args.config);

    let redirect = run(
        &mut wizard,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    debug!(redirect_to = redirect.target(), "recovery complete");

    Ok(())
}

/// Drives the wizard to the login redirect using `input` and `output`.
///
/// # Errors
/// Returns an error if `input` ends before the redirect or `output` fails.
pub async fn run<A, R, W>(
    wizard: &mut RecoveryWizard<A>,
    input: R,
    mut output: W,
) -> Result<Redirect>
where
    A: RecoveryApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    say(
        &mut output,
        &step_header(Step::Email, "Forgot your password? Enter your email to receive a code."),
    )
    .await?;
    while wizard.step() == Step::Email {
        let email = ask(&mut lines, &mut output, "Email: ").await?;
        // failures are reported through the step message
        let _ = wizard.submit_email(&email).await;
        show_message(wizard, &mut output).await?;
    }

    say(
        &mut output,
        &step_header(
            Step::Otp,
            &format!(
                "Enter the {OTP_LENGTH}-digit code sent to {}. \
                 Use '{BACKSPACE}' to erase, '{RESEND_COMMAND}' for a new code, an empty line to verify.",
                wizard.session().email()
            ),
        ),
    )
    .await?;
    while wizard.step() == Step::Otp {
        if let Some(step) = wizard.otp_step() {
            let grid = render_grid(step.grid());
            say(&mut output, &format!("{grid}\n")).await?;
        }

        let line = ask(&mut lines, &mut output, "Code: ").await?;
        match line.trim() {
            RESEND_COMMAND => {
                let _ = wizard.resend_otp().await;
                show_message(wizard, &mut output).await?;
            }
            "" => {
                let verified = wizard.submit_otp().await.is_ok();
                show_message(wizard, &mut output).await?;
                if verified {
                    wait_for(wizard, |wizard| wizard.step() != Step::Otp).await?;
                }
            }
            text => type_code(wizard, text),
        }
    }

    say(&mut output, &step_header(Step::Reset, "Choose a new password.")).await?;
    loop {
        let new_password =
            SecretString::from(ask(&mut lines, &mut output, "New password: ").await?);
        let confirm_password =
            SecretString::from(ask(&mut lines, &mut output, "Confirm password: ").await?);

        let done = wizard
            .submit_new_password(&new_password, &confirm_password)
            .await
            .is_ok();
        show_message(wizard, &mut output).await?;
        if done {
            break;
        }
    }

    wait_for(wizard, |wizard| wizard.redirect().is_some()).await?;
    let mut redirect = wizard
        .take_redirect()
        .ok_or_else(|| anyhow!("recovery finished without a redirect"))?;

    say(&mut output, &format!("Continue at {}\n", redirect.target())).await?;
    if let Some(flash) = redirect.take_flash() {
        say(&mut output, &format!("{flash}\n")).await?;
    }

    Ok(redirect)
}

/// `Step 2 of 3: ...` banner printed when a step starts.
fn step_header(step: Step, text: &str) -> String {
    format!("Step {} of {}: {text}\n", step.number(), Step::LAST.number())
}

/// Draws the code cells, the focused one in parentheses: `[1][2]( )[ ][ ][ ]`.
#[must_use]
pub fn render_grid(grid: &OtpGrid) -> String {
    let focused = grid.focused();
    grid.digits()
        .iter()
        .enumerate()
        .map(|(index, digit)| {
            let digit = if digit.is_empty() { " " } else { digit };
            if focused == Some(index) {
                format!("({digit})")
            } else {
                format!("[{digit}]")
            }
        })
        .collect()
}

/// Replays `text` as keystrokes on the focused cell. Rejected characters are skipped.
fn type_code<A: RecoveryApi>(wizard: &mut RecoveryWizard<A>, text: &str) {
    for ch in text.chars() {
        let Some((index, filled)) = wizard.otp_step().map(|step| {
            let index = step.grid().focused().unwrap_or(0);
            let filled = step.digits().get(index).is_some_and(|digit| !digit.is_empty());
            (index, filled)
        }) else {
            return;
        };

        if ch == BACKSPACE {
            wizard.otp_key_down(index, Key::Backspace);
            if filled {
                let _ = wizard.input_otp(index, "");
            }
        } else if let Err(err) = wizard.input_otp(index, ch.encode_utf8(&mut [0; 4])) {
            debug!("ignored code input: {err}");
        }
    }
}

async fn wait_for<A, F>(wizard: &mut RecoveryWizard<A>, done: F) -> Result<()>
where
    A: RecoveryApi,
    F: Fn(&RecoveryWizard<A>) -> bool,
{
    while !done(&*wizard) {
        if wizard.next_event().await.is_none() {
            return Err(anyhow!("recovery stalled waiting for the next step"));
        }
    }
    Ok(())
}

async fn show_message<A: RecoveryApi, W: AsyncWrite + Unpin>(
    wizard: &RecoveryWizard<A>,
    output: &mut W,
) -> Result<()> {
    if let Some(message) = wizard.message() {
        let prefix = if message.is_error() { "error: " } else { "" };
        say(output, &format!("{prefix}{message}\n")).await?;
    }
    Ok(())
}

async fn ask<R, W>(lines: &mut Lines<R>, output: &mut W, prompt: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(output, prompt).await?;
    lines
        .next_line()
        .await?
        .context("input closed before password recovery finished")
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AppError;
    use crate::features::recovery::{ApiResponse, ResetPasswordRequest, VerifyOtpRequest};
    use crate::recovery::testing::{Call, MockApi};

    fn wizard(api: MockApi) -> RecoveryWizard<MockApi> {
        RecoveryWizard::new(api, &AppConfig::default())
    }

    async fn drive(
        wizard: &mut RecoveryWizard<MockApi>,
        script: &str,
    ) -> (Result<Redirect>, String) {
        let mut output = Vec::new();
        let result = run(wizard, script.as_bytes(), &mut output).await;
        (result, String::from_utf8_lossy(&output).into_owned())
    }

    #[test]
    fn render_grid_marks_the_focused_cell() {
        let mut grid = OtpGrid::new();
        grid.mount();
        assert_eq!(render_grid(&grid), "( )[ ][ ][ ][ ][ ]");

        assert!(grid.input(0, "4").is_ok());
        assert!(grid.input(1, "2").is_ok());
        assert_eq!(render_grid(&grid), "[4][2]( )[ ][ ][ ]");
    }

    #[tokio::test]
    async fn typing_fills_cells_from_the_focus() {
        let mut wizard = wizard(MockApi::new());
        assert!(wizard.submit_email("a@b.com").await.is_ok());

        type_code(&mut wizard, "12x3");
        assert_eq!(
            wizard.otp_step().map(|step| step.digits().code()),
            Some("123".to_string())
        );

        // step back from the empty cell, erase the 3, then retype
        type_code(&mut wizard, "--9");
        assert_eq!(
            wizard.otp_step().map(|step| step.digits().code()),
            Some("129".to_string())
        );
        assert_eq!(wizard.session().otp_digits().code(), "129");
    }

    #[tokio::test(start_paused = true)]
    async fn full_flow_reaches_login() {
        let api = MockApi::new()
            .reply_request_otp(Ok(ApiResponse::failure(Some("User not found"))))
            .reply_verify_otp(Ok(ApiResponse::failure(Some("Invalid OTP"))));
        let mut wizard = wizard(api);
        let script = "nobody\nghost@b.com\na@b.com\n\
                      123\n\n456\n\n\n\
                      abc\nxyz\nabc123\nabc123\n";

        let (result, output) = drive(&mut wizard, script).await;

        let redirect = result.map_err(|err| err.to_string());
        assert_eq!(
            redirect.as_ref().map(Redirect::target),
            Ok(crate::client::config::DEFAULT_LOGIN_URL)
        );
        assert!(output.contains("error: Please enter a valid email address."));
        assert!(output.contains("error: User not found"));
        assert!(output.contains("Step 1 of 3: Forgot your password?"));
        assert!(output.contains("Step 2 of 3: Enter the 6-digit code sent to a@b.com."));
        assert!(output.contains("Step 3 of 3: Choose a new password."));
        assert!(output.contains("error: Please enter the complete 6-digit code."));
        assert!(output.contains("error: Invalid OTP"));
        assert!(output.contains("OTP verified successfully."));
        assert!(output.contains("error: Passwords do not match."));
        assert!(output.contains("Password reset successfully. Redirecting to login..."));
        assert!(output.contains("Continue at /login"));
        assert!(
            output.contains("Password reset successful. Please log in with your new password.")
        );
        assert_eq!(wizard.step(), Step::Reset);
    }

    #[tokio::test(start_paused = true)]
    async fn submits_the_typed_code_and_password() {
        let mut wizard = wizard(MockApi::new());
        let script = "a@b.com\n12-34\n567\n\nabc123\nabc123\n";

        let (result, _) = drive(&mut wizard, script).await;
        assert!(result.is_ok());

        let calls = wizard.api().calls();
        assert_eq!(
            calls.get(1),
            Some(&Call::VerifyOtp(VerifyOtpRequest {
                email: "a@b.com".to_string(),
                otp: "134567".to_string(),
            }))
        );
        assert_eq!(
            calls.get(2),
            Some(&Call::ResetPassword(ResetPasswordRequest {
                email: "a@b.com".to_string(),
                otp: "134567".to_string(),
                new_password: "abc123".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn resend_clears_the_grid() {
        let mut wizard = wizard(MockApi::new());

        let (result, output) = drive(&mut wizard, "a@b.com\n12\nresend\n").await;
        assert!(result.is_err());
        assert!(output.contains("A new code has been sent to your email."));
        assert!(output.contains("[1][2]( )[ ][ ][ ]"));
        assert_eq!(output.matches("( )[ ][ ][ ][ ][ ]").count(), 2);
        assert_eq!(wizard.api().calls().len(), 2);
    }

    #[tokio::test]
    async fn network_errors_keep_prompting() {
        let api = MockApi::new()
            .reply_request_otp(Err(AppError::Network("connection refused".to_string())));
        let mut wizard = wizard(api);

        let (result, output) = drive(&mut wizard, "a@b.com\n").await;
        assert!(result.is_err());
        assert!(output.contains("error: Network error. Please try again."));
        assert!(output.ends_with("Email: "));
        assert_eq!(wizard.step(), Step::Email);
    }

    #[tokio::test]
    async fn closed_input_is_an_error() {
        let mut wizard = wizard(MockApi::new());
        let (result, _) = drive(&mut wizard, "").await;
        assert!(result.is_err());
        if let Err(err) = result {
            assert!(err.to_string().contains("input closed"));
        }
    }
}
