//! Development certificate trust
//!
//! `dotnet dev-certs https --check --trust` exits 6 when no certificate exists
//! and 7 when it exists but is untrusted. Both can be fixed by running
//! `--trust`, which on macOS needs root. The user is asked first; declining
//! is remembered for the rest of the session.

use crate::config::TrustPromptMode;
use crate::error::{DevCertError, Result};
use crate::providers::{ExecOptions, HostOs, OutputResponder, UserInteraction};
use crate::sdk::DotnetSdk;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::DevCertSession;

pub const TRUST_PROMPT: &str = "The ASP.NET Core HTTPS development certificate is not trusted. \
     To trust the certificate, run `dotnet dev-certs https --trust`, or choose \"Trust\" now.";
pub const TRUST_ACTION: &str = "Trust";
pub const TERMINAL_TITLE: &str = "Trust ASP.NET Core HTTPS development certificate";
pub const FIRST_PASSWORD_PROMPT: &str = "Enter your password to trust the development certificate";
pub const RETRY_PASSWORD_PROMPT: &str = "Incorrect password, try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustOutcome {
    /// The host OS has no central trust store
    Unsupported,
    /// Trusted or declined earlier in the session
    AlreadyResolved,
    /// The check passed without changes
    AlreadyTrusted,
    /// The user accepted and the trust command completed
    Trusted,
    /// The user declined; continuing untrusted
    Declined,
}

/// True when the last output line looks like an elevation password prompt
/// (`Password:`, `[sudo] password for dev:`).
///
/// Only complete text is judged; [`PasswordRelay`] carries an unterminated
/// trailing line over to the next chunk so a prompt split across reads is
/// still seen.
#[must_use]
pub fn is_password_prompt(chunk: &str) -> bool {
    chunk
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.ends_with(':') && line.to_ascii_lowercase().contains("password"))
}

/// Answers `sudo -S` password prompts with masked user input.
pub struct PasswordRelay {
    ui: Arc<dyn UserInteraction>,
    attempts: AtomicUsize,
    partial_line: Mutex<String>,
}

impl PasswordRelay {
    pub fn new(ui: Arc<dyn UserInteraction>) -> Self {
        Self {
            ui,
            attempts: AtomicUsize::new(0),
            partial_line: Mutex::new(String::new()),
        }
    }

    /// Joins `chunk` to the unfinished line from earlier output and checks
    /// the result for a prompt
    fn saw_prompt(&self, chunk: &str) -> bool {
        let mut pending = self
            .partial_line
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.push_str(chunk);

        if is_password_prompt(&pending) {
            pending.clear();
            return true;
        }

        let complete = pending.rfind('\n').map_or(0, |i| i + 1);
        pending.drain(..complete);
        false
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutputResponder for PasswordRelay {
    async fn on_output(&self, chunk: &str) -> Result<Option<String>> {
        if !self.saw_prompt(chunk) {
            return Ok(None);
        }

        let prompt = if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            FIRST_PASSWORD_PROMPT
        } else {
            RETRY_PASSWORD_PROMPT
        };

        match self.ui.input_password(prompt).await? {
            Some(password) => Ok(Some(password)),
            None => Err(DevCertError::Cancelled(
                "password entry for certificate trust was dismissed".to_string(),
            )),
        }
    }
}

impl DotnetSdk {
    /// Establish trust in the development certificate if the OS supports it
    pub async fn ensure_certificate_trusted(
        &self,
        session: &mut DevCertSession,
    ) -> Result<TrustOutcome> {
        let os = self.providers.os.os();
        if !os.has_trust_store() {
            crate::warn!(
                "No central certificate trust store on this OS; trust the certificate manually"
            );
            return Ok(TrustOutcome::Unsupported);
        }
        if session.trust_resolved() {
            return Ok(TrustOutcome::AlreadyResolved);
        }

        match self.exec(&self.command.check_trust()).await {
            Ok(_) => {
                session.mark_trust_resolved();
                crate::success!("Development certificate already trusted");
                return Ok(TrustOutcome::AlreadyTrusted);
            }
            Err(e) if e.exec_kind().is_some_and(|k| k.is_trust_recoverable()) => {}
            Err(e) => return Err(e),
        }

        if !self.providers.ui.confirm(TRUST_PROMPT, TRUST_ACTION).await? {
            session.mark_trust_resolved();
            crate::warn!("Continuing without a trusted development certificate");
            return Ok(TrustOutcome::Declined);
        }

        match self.config.trust_prompt {
            TrustPromptMode::PasswordRelay => self.trust_with_password_relay(os).await?,
            TrustPromptMode::Terminal => self.trust_in_terminal(os).await?,
        }

        session.mark_trust_resolved();
        crate::success!("Development certificate trusted");
        Ok(TrustOutcome::Trusted)
    }

    async fn trust_with_password_relay(&self, os: HostOs) -> Result<()> {
        if os.is_windows() {
            // Windows shows its own confirmation dialog
            self.exec(&self.command.trust(None)).await?;
            return Ok(());
        }

        let relay = Arc::new(PasswordRelay::new(Arc::clone(&self.providers.ui)));
        self.providers
            .process
            .execute(
                &self.command.trust(Some("sudo -S")),
                ExecOptions::with_responder(relay),
            )
            .await?;
        Ok(())
    }

    /// Completes when the terminal closes, whether or not trust succeeded
    async fn trust_in_terminal(&self, os: HostOs) -> Result<()> {
        let elevate = (!os.is_windows()).then_some("sudo");
        let command = self.command.trust(elevate);
        let wait = self.providers.ui.run_in_terminal(TERMINAL_TITLE, &command);

        match self.config.terminal_timeout() {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| DevCertError::TerminalTimeout(limit.as_secs()))?,
            None => wait.await,
        }
    }
}
