//! Configuration structures for the dev-cert workflow.

use crate::error::{DevCertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default SDK executable looked up on `PATH`
pub const DEFAULT_TOOL: &str = "dotnet";

/// Configuration for the dotnet SDK façade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DevCertConfig {
    /// SDK executable name or path
    #[serde(default = "default_tool")]
    pub tool: String,

    /// How the user is taken through `dev-certs https --trust`
    #[serde(default)]
    pub trust_prompt: TrustPromptMode,

    /// Upper bound on waiting for the trust terminal to close
    #[serde(default)]
    pub terminal_timeout_secs: Option<u64>,

    /// Host directory receiving exported `.pfx` files; `~` is expanded
    #[serde(default)]
    pub certificate_dir: Option<PathBuf>,

    /// Export the certificate even when the `.pfx` already exists
    #[serde(default)]
    pub always_export: bool,
}

impl Default for DevCertConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            trust_prompt: TrustPromptMode::default(),
            terminal_timeout_secs: None,
            certificate_dir: None,
            always_export: false,
        }
    }
}

/// Trust interaction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustPromptMode {
    /// Run the trust command in-process and relay an elevation password to it
    #[default]
    #[serde(rename = "password")]
    PasswordRelay,

    /// Run the trust command in an interactive terminal and wait for it to close
    #[serde(rename = "terminal")]
    Terminal,
}

impl TrustPromptMode {
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PasswordRelay => "password relay",
            Self::Terminal => "interactive terminal",
        }
    }
}

impl DevCertConfig {
    /// Parse a TOML configuration document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            DevCertError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(DevCertError::Config("tool must not be empty".to_string()));
        }
        if self.terminal_timeout_secs == Some(0) {
            return Err(DevCertError::Config(
                "terminal_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn terminal_timeout(&self) -> Option<Duration> {
        self.terminal_timeout_secs.map(Duration::from_secs)
    }

    /// Configured certificate directory with a leading `~` expanded
    #[must_use]
    pub fn expanded_certificate_dir(&self) -> Option<PathBuf> {
        self.certificate_dir.as_ref().map(|dir| {
            let raw = dir.to_string_lossy();
            PathBuf::from(shellexpand::tilde(&raw).into_owned())
        })
    }
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}
