//! ASP.NET Core development certificate provisioning
//!
//! # Module Organization
//!
//! - `secrets` - user-secrets store initialization
//! - `trust` - trust check, prompt and elevation
//! - `export` - `.pfx` export and password storage
//!
//! [`DotnetSdk::trust_and_export`] runs all three in order, once per project
//! per [`DevCertSession`].

use crate::error::Result;
use crate::sdk::DotnetSdk;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

pub mod export;
pub mod secrets;
pub mod trust;

pub use export::ExportOutcome;
pub use secrets::{SecretsInit, USER_SECRETS_ID_MARKER};
pub use trust::TrustOutcome;

/// Idempotency state for one launcher session.
///
/// Created by the caller and passed to every workflow call; dropping it
/// forgets everything, the same as restarting the host.
#[derive(Debug, Default, Clone)]
pub struct DevCertSession {
    configured_projects: HashSet<PathBuf>,
    trust_resolved: bool,
}

impl DevCertSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects are compared lexically with `.` components dropped, so
    /// `web.csproj` and `./web.csproj` match. `..` and symlinks are not
    /// resolved; callers mixing relative and absolute paths should
    /// canonicalize first.
    #[must_use]
    pub fn is_configured(&self, project: &Path) -> bool {
        self.configured_projects.contains(&session_key(project))
    }

    pub fn mark_configured(&mut self, project: &Path) {
        self.configured_projects.insert(session_key(project));
    }

    /// Trust was established or declined earlier in this session
    #[must_use]
    pub fn trust_resolved(&self) -> bool {
        self.trust_resolved
    }

    pub fn mark_trust_resolved(&mut self) {
        self.trust_resolved = true;
    }
}

fn session_key(project: &Path) -> PathBuf {
    project
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// 32 random bytes, hex encoded
pub(crate) fn generate_password() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

impl DotnetSdk {
    /// Make `project` ready to serve HTTPS with the development certificate.
    ///
    /// Initializes user secrets, establishes trust where the OS supports it,
    /// exports the certificate and stores its password in the project's
    /// user secrets. Projects already configured in `session` are skipped
    /// without running anything.
    pub async fn trust_and_export(
        &self,
        session: &mut DevCertSession,
        project: &Path,
    ) -> Result<()> {
        if session.is_configured(project) {
            return Ok(());
        }

        self.init_user_secrets(project).await?;
        self.ensure_certificate_trusted(session).await?;
        self.export_certificate(project).await?;

        session.mark_configured(project);
        crate::success!("Development certificate ready for {}", project.display());
        Ok(())
    }
}
