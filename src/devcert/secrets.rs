//! User-secrets store initialization

use crate::error::Result;
use crate::sdk::DotnetSdk;
use crate::version::SdkVersion;
use std::path::Path;

/// Project file element that holds the user-secrets id
pub const USER_SECRETS_ID_MARKER: &str = "UserSecretsId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsInit {
    /// The project file already declares a user-secrets id
    AlreadyConfigured,
    /// A store was created with this id
    Initialized(String),
    /// The SDK is too old for `user-secrets init`, or its version is unknown
    UnsupportedSdk(Option<SdkVersion>),
}

impl DotnetSdk {
    /// Give `project` a user-secrets store if it has none.
    ///
    /// Only SDK 3.0.0 and later can run `user-secrets init`; on older or
    /// unidentifiable SDKs this is a no-op. Command failures propagate.
    pub async fn init_user_secrets(&self, project: &Path) -> Result<SecretsInit> {
        let contents = self.providers.fs.read_file(project).await?;
        if contents.contains(USER_SECRETS_ID_MARKER) {
            return Ok(SecretsInit::AlreadyConfigured);
        }

        let version = self.sdk_version().await;
        match version {
            Some(v) if v.supports_user_secrets_init() => {}
            _ => {
                crate::warn!(
                    "Skipping user-secrets init: requires .NET SDK {} or later (found {})",
                    SdkVersion::USER_SECRETS_INIT,
                    version.map_or_else(|| "unknown".to_string(), |v| v.to_string())
                );
                return Ok(SecretsInit::UnsupportedSdk(version));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.exec(&self.command.user_secrets_init(project, &id)).await?;

        crate::info!("Initialized user secrets for {} ({id})", project.display());
        Ok(SecretsInit::Initialized(id))
    }
}
