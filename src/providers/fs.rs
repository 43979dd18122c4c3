use super::FileSystemProvider;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Local disk through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystemProvider for LocalFileSystem {
    async fn read_file(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn file_exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            // Already gone is what the caller wanted
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => Ok(other?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_check_delete() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("web.csproj");
        tokio::fs::write(&path, "<Project />").await.unwrap();

        let fs = LocalFileSystem;
        assert!(fs.file_exists(&path).await.unwrap());
        assert_eq!(fs.read_file(&path).await.unwrap(), "<Project />");

        fs.delete_file(&path).await.unwrap();
        assert!(!fs.file_exists(&path).await.unwrap());
        fs.delete_file(&path).await.unwrap();
    }
}
