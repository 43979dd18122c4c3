//! Command-line construction for the dotnet SDK tool

use std::collections::BTreeMap;
use std::path::Path;

/// User secret that Kestrel reads the development certificate password from
pub const KESTREL_CERT_PASSWORD_KEY: &str = "Kestrel:Certificates:Development:Password";

/// Options for `dotnet msbuild`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub target: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl BuildOptions {
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Formats shell command lines for one dotnet executable.
///
/// Paths and values are interpolated literally between double quotes; callers
/// are trusted not to pass embedded quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotnetCommand {
    tool: String,
}

impl Default for DotnetCommand {
    fn default() -> Self {
        Self::new("dotnet")
    }
}

impl DotnetCommand {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    #[must_use]
    pub fn msbuild(&self, project: &Path, options: &BuildOptions) -> String {
        let mut command = format!("{} msbuild \"{}\"", self.tool, project.display());

        if let Some(target) = &options.target {
            command.push_str(&format!(" /t:{target}"));
        }

        for (key, value) in &options.properties {
            command.push_str(&format!(" /p:{key}=\"{value}\""));
        }

        command
    }

    #[must_use]
    pub fn version(&self) -> String {
        format!("{} --version", self.tool)
    }

    #[must_use]
    pub fn user_secrets_init(&self, project: &Path, id: &str) -> String {
        format!(
            "{} user-secrets init --project \"{}\" --id {id}",
            self.tool,
            project.display()
        )
    }

    #[must_use]
    pub fn user_secrets_set(&self, project: &Path, key: &str, value: &str) -> String {
        format!(
            "{} user-secrets --project \"{}\" set {key} \"{value}\"",
            self.tool,
            project.display()
        )
    }

    #[must_use]
    pub fn check_trust(&self) -> String {
        format!("{} dev-certs https --check --trust", self.tool)
    }

    /// `dev-certs https --trust`, optionally behind a privilege-elevation prefix
    /// such as `sudo -S`
    #[must_use]
    pub fn trust(&self, elevate: Option<&str>) -> String {
        match elevate {
            Some(prefix) => format!("{prefix} {} dev-certs https --trust", self.tool),
            None => format!("{} dev-certs https --trust", self.tool),
        }
    }

    #[must_use]
    pub fn export_certificate(&self, path: &Path, password: &str) -> String {
        format!(
            "{} dev-certs https -ep \"{}\" -p \"{password}\"",
            self.tool,
            path.display()
        )
    }
}
