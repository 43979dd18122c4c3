//! The dotnet SDK façade

use crate::command::{BuildOptions, DotnetCommand};
use crate::config::DevCertConfig;
use crate::error::{DevCertError, Result};
use crate::paths::HostSecretsFolders;
use crate::providers::{ExecOptions, Providers};
use crate::version::SdkVersion;
use std::path::{Path, PathBuf};

/// Drives one dotnet executable through build, version, user-secrets and
/// dev-certs subcommands.
///
/// Holds no per-run state; idempotency lives in
/// [`DevCertSession`](crate::devcert::DevCertSession), which callers own.
pub struct DotnetSdk {
    pub(crate) command: DotnetCommand,
    pub(crate) config: DevCertConfig,
    pub(crate) folders: HostSecretsFolders,
    pub(crate) providers: Providers,
}

impl DotnetSdk {
    pub fn new(config: DevCertConfig, folders: HostSecretsFolders, providers: Providers) -> Self {
        let folders = match config.expanded_certificate_dir() {
            Some(dir) => folders.with_certificate_folder(dir),
            None => folders,
        };

        Self {
            command: DotnetCommand::new(config.tool.clone()),
            config,
            folders,
            providers,
        }
    }

    /// Build with host folders detected for the providers' OS
    pub fn from_config(config: DevCertConfig, providers: Providers) -> Result<Self> {
        config.validate()?;
        let folders = HostSecretsFolders::detect(providers.os.os())?;
        Ok(Self::new(config, folders, providers))
    }

    #[must_use]
    pub fn command(&self) -> &DotnetCommand {
        &self.command
    }

    #[must_use]
    pub fn config(&self) -> &DevCertConfig {
        &self.config
    }

    #[must_use]
    pub fn folders(&self) -> &HostSecretsFolders {
        &self.folders
    }

    pub(crate) async fn exec(&self, command: &str) -> Result<String> {
        self.providers
            .process
            .execute(command, ExecOptions::default())
            .await
    }

    /// `dotnet msbuild` command line for `project`
    #[must_use]
    pub fn build_command(&self, project: &Path, options: &BuildOptions) -> String {
        self.command.msbuild(project, options)
    }

    /// Run `dotnet msbuild` and return its stdout
    pub async fn build(&self, project: &Path, options: &BuildOptions) -> Result<String> {
        self.exec(&self.build_command(project, options)).await
    }

    /// Trimmed `dotnet --version` output, or `None` if it could not be run
    pub async fn version(&self) -> Option<String> {
        match self.exec(&self.command.version()).await {
            Ok(output) => {
                let version = output.trim();
                (!version.is_empty()).then(|| version.to_string())
            }
            Err(_) => None,
        }
    }

    pub async fn sdk_version(&self) -> Option<SdkVersion> {
        self.version().await.as_deref().and_then(SdkVersion::parse)
    }
}

/// Resolve `tool` on `PATH`, failing with install guidance when absent
pub fn locate_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| {
        DevCertError::MissingDependency(format!(
            "'{tool}' not found in PATH.\n\
             \n\
             Install the .NET SDK from https://dotnet.microsoft.com/download\n\
             or set `tool` in the configuration file to the dotnet executable."
        ))
    })
}
