//! Host folders shared with development containers

use crate::error::{DevCertError, Result};
use crate::providers::HostOs;
use std::path::{Path, PathBuf};

/// Where the SDK keeps exported dev certificates and user secrets on the host.
///
/// Launchers mount these into containers so Kestrel can find the `.pfx` and
/// the password stored alongside the project's user secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSecretsFolders {
    pub certificate_folder: PathBuf,
    pub user_secrets_folder: PathBuf,
}

impl HostSecretsFolders {
    /// Derive the folders from a roaming app-data dir (Windows) or home dir
    #[must_use]
    pub fn for_os(os: HostOs, app_data: Option<&Path>, home: &Path) -> Self {
        match (os, app_data) {
            (HostOs::Windows, Some(app_data)) => Self {
                certificate_folder: app_data.join("ASP.NET").join("Https"),
                user_secrets_folder: app_data.join("Microsoft").join("UserSecrets"),
            },
            _ => Self {
                certificate_folder: home.join(".aspnet").join("https"),
                user_secrets_folder: home.join(".microsoft").join("usersecrets"),
            },
        }
    }

    /// Folders for the current user on `os`
    pub fn detect(os: HostOs) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| DevCertError::Config("Could not determine home directory".to_string()))?;
        let app_data = dirs::config_dir();
        Ok(Self::for_os(os, app_data.as_deref(), &home))
    }

    #[must_use]
    pub fn with_certificate_folder(mut self, folder: PathBuf) -> Self {
        self.certificate_folder = folder;
        self
    }

    /// `<certificate folder>/<project file stem>.pfx`
    #[must_use]
    pub fn export_path(&self, project: &Path) -> PathBuf {
        let stem = project
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "aspnetapp".to_string());
        self.certificate_folder.join(format!("{stem}.pfx"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_style_folders() {
        let folders = HostSecretsFolders::for_os(HostOs::Mac, None, Path::new("/Users/dev"));
        assert_eq!(folders.certificate_folder, PathBuf::from("/Users/dev/.aspnet/https"));
        assert_eq!(
            folders.user_secrets_folder,
            PathBuf::from("/Users/dev/.microsoft/usersecrets")
        );
    }

    #[test]
    fn windows_uses_app_data() {
        let app_data = PathBuf::from("C:/Users/dev/AppData/Roaming");
        let folders =
            HostSecretsFolders::for_os(HostOs::Windows, Some(&app_data), Path::new("C:/Users/dev"));
        assert_eq!(folders.certificate_folder, app_data.join("ASP.NET").join("Https"));
        assert_eq!(
            folders.user_secrets_folder,
            app_data.join("Microsoft").join("UserSecrets")
        );
    }

    #[test]
    fn export_path_uses_project_stem() {
        let folders = HostSecretsFolders::for_os(HostOs::Linux, None, Path::new("/home/dev"))
            .with_certificate_folder(PathBuf::from("/certs"));
        assert_eq!(
            folders.export_path(Path::new("/src/Web.Api/Web.Api.csproj")),
            PathBuf::from("/certs/Web.Api.pfx")
        );
    }
}
