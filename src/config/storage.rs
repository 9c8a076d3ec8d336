use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("docs");
        let storage = LocalStorage::new(base.to_string_lossy().into_owned());

        storage
            .write_file("index.html", b"<!DOCTYPE html>")
            .await
            .unwrap();

        let written = storage.read_file("index.html").await.unwrap();
        assert_eq!(written, b"<!DOCTYPE html>");
        assert!(base.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        assert!(storage.read_file("missing.html").await.is_err());
    }
}
