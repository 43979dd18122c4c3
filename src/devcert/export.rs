//! Certificate export and password storage

use crate::command::KESTREL_CERT_PASSWORD_KEY;
use crate::error::{DevCertError, Result};
use crate::sdk::DotnetSdk;
use std::io::Write;
use std::path::{Path, PathBuf};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};
use zeroize::Zeroize;

use super::generate_password;

/// Which half of export-then-store failed
enum ExportFailure {
    Export(DevCertError),
    Store(DevCertError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A `.pfx` for the project was already on disk
    AlreadyExported(PathBuf),
    Exported(PathBuf),
}

impl DotnetSdk {
    /// Export the development certificate for `project` to the host
    /// certificate folder and record its password in the project's user
    /// secrets.
    ///
    /// If the export fails, a file it may have partially written is removed;
    /// a `.pfx` that was already on disk is left alone since its password is
    /// still the stored one. If storing the password fails, the freshly
    /// exported file is removed so the next run exports again.
    pub async fn export_certificate(&self, project: &Path) -> Result<ExportOutcome> {
        let export_path = self.folders.export_path(project);

        let existed_before = self.providers.fs.file_exists(&export_path).await?;
        if existed_before && !self.config.always_export {
            return Ok(ExportOutcome::AlreadyExported(export_path));
        }

        let mut password = generate_password();
        let result = self.export_with_password(project, &export_path, &password).await;
        password.zeroize();

        match result {
            Ok(()) => {}
            Err(ExportFailure::Export(e)) => {
                if !existed_before {
                    self.cleanup_partial_export(&export_path).await;
                }
                return Err(e);
            }
            Err(ExportFailure::Store(e)) => {
                self.cleanup_partial_export(&export_path).await;
                return Err(e);
            }
        }

        crate::info!("Exported development certificate to {}", export_path.display());
        Ok(ExportOutcome::Exported(export_path))
    }

    async fn export_with_password(
        &self,
        project: &Path,
        export_path: &Path,
        password: &str,
    ) -> std::result::Result<(), ExportFailure> {
        let mut export = self.command.export_certificate(export_path, password);
        let exported = self.exec(&export).await;
        export.zeroize();
        exported.map_err(ExportFailure::Export)?;

        let mut store = self
            .command
            .user_secrets_set(project, KESTREL_CERT_PASSWORD_KEY, password);
        let stored = self.exec(&store).await;
        store.zeroize();
        stored.map_err(ExportFailure::Store)?;

        Ok(())
    }

    /// Best-effort removal of an export file; failures are reported, never
    /// returned, so the original error reaches the caller.
    async fn cleanup_partial_export(&self, path: &Path) {
        let fs = &self.providers.fs;
        let result = match fs.file_exists(path).await {
            Ok(true) => fs.delete_file(path).await,
            Ok(false) => return,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
            let mut buffer = bufwtr.buffer();

            let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            let _ = writeln!(&mut buffer, "⚠️  Warning: Failed to clean up partial certificate export");
            let _ = buffer.reset();
            let _ = writeln!(&mut buffer, "   Path: {}", path.display());
            let _ = writeln!(&mut buffer, "   Error: {e}");
            let _ = writeln!(
                &mut buffer,
                "   Suggestion: Delete the file manually so the next run exports again"
            );

            let _ = bufwtr.print(&buffer);
        }
    }
}
