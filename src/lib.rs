//! Build projects and provision a trusted ASP.NET Core development
//! certificate by driving the dotnet SDK CLI.
//!
//! ```no_run
//! use dotnet_devcert::{DevCertConfig, DevCertSession, DotnetSdk, Providers};
//! use std::path::Path;
//!
//! # async fn run() -> dotnet_devcert::Result<()> {
//! let sdk = DotnetSdk::from_config(DevCertConfig::default(), Providers::system())?;
//! let mut session = DevCertSession::new();
//! sdk.trust_and_export(&mut session, Path::new("web/web.csproj")).await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod prompts;

pub mod command;
pub mod config;
pub mod devcert;
pub mod error;
pub mod paths;
pub mod providers;
pub mod sdk;
pub mod version;

// Re-export common types
pub use command::{BuildOptions, DotnetCommand};
pub use config::{DevCertConfig, TrustPromptMode};
pub use devcert::{DevCertSession, ExportOutcome, SecretsInit, TrustOutcome};
pub use error::{DevCertError, ExecError, ExecErrorKind, Result};
pub use paths::HostSecretsFolders;
pub use providers::{HostOs, Providers};
pub use sdk::{DotnetSdk, locate_tool};
pub use version::SdkVersion;
