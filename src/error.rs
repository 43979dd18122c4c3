//! Error types for the dotnet CLI orchestration layer.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DevCertError>;

/// Exit code `dotnet dev-certs https --check` uses when no valid certificate exists
pub const EXIT_NO_VALID_CERTIFICATE: i32 = 6;

/// Exit code `dotnet dev-certs https --check --trust` uses for an untrusted certificate
pub const EXIT_CERTIFICATE_NOT_TRUSTED: i32 = 7;

#[derive(Debug, Error)]
pub enum DevCertError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Timed out after {0} seconds waiting for the terminal to close")]
    TerminalTimeout(u64),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl DevCertError {
    /// Classification of a failed command, if this error came from one
    #[must_use]
    pub fn exec_kind(&self) -> Option<ExecErrorKind> {
        match self {
            Self::Exec(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Typed classification of a non-zero exit from the SDK tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    CertificateMissing,
    CertificateNotTrusted,
    Other,
}

impl ExecErrorKind {
    #[must_use]
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(EXIT_NO_VALID_CERTIFICATE) => Self::CertificateMissing,
            Some(EXIT_CERTIFICATE_NOT_TRUSTED) => Self::CertificateNotTrusted,
            _ => Self::Other,
        }
    }

    /// Whether the user can fix this failure by trusting the certificate
    #[must_use]
    pub fn is_trust_recoverable(self) -> bool {
        matches!(self, Self::CertificateMissing | Self::CertificateNotTrusted)
    }
}

/// A command that ran but exited unsuccessfully.
#[derive(Debug)]
pub struct ExecError {
    command: String,
    exit_code: Option<i32>,
    kind: ExecErrorKind,
    output: String,
}

impl ExecError {
    pub fn new(command: impl Into<String>, exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code,
            kind: ExecErrorKind::from_exit_code(exit_code),
            output: output.into(),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    #[must_use]
    pub fn kind(&self) -> ExecErrorKind {
        self.kind
    }

    /// Captured stderr (falling back to stdout) of the failed process
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "Command `{}` exited with code {code}", self.command)?,
            None => write!(f, "Command `{}` was terminated by a signal", self.command)?,
        }
        let output = self.output.trim();
        if !output.is_empty() {
            write!(f, ": {output}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecError {}
