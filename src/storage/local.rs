//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::Registration;
use crate::output::{OutputFormat, render};
use crate::storage::WriteMetadata;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Storage rooted at the parent directory of `file`.
    pub fn for_file(file: &Path) -> Self {
        let root = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(root)
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Render registrations in `format` and write them under `key`.
    pub async fn write_registrations(
        &self,
        key: &str,
        format: OutputFormat,
        registrations: &[Registration],
    ) -> Result<WriteMetadata> {
        let bytes = render(format, registrations)?;
        let location = self.write_bytes(key, &bytes).await?;

        log::info!(
            "Wrote {} registration(s) as {} to {}",
            registrations.len(),
            format,
            location.display()
        );

        Ok(WriteMetadata {
            record_count: registrations.len(),
            bytes_written: bytes.len(),
            location,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_bytes_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let path = storage.write_bytes("test.txt", b"hello").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(!storage.path("test.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_bytes_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"old contents").await.unwrap();
        let path = storage.write_bytes("test.txt", b"new").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_registrations_creates_dirs() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let regs = vec![Registration {
            reg_no: "HRB 781234".to_string(),
            name: "Muster Solar GmbH".to_string(),
            ..Registration::default()
        }];

        let meta = storage
            .write_registrations("exports/2024-03-12.csv", OutputFormat::Csv, &regs)
            .await
            .unwrap();

        assert_eq!(meta.record_count, 1);
        assert_eq!(meta.location, tmp.path().join("exports/2024-03-12.csv"));

        let text = std::fs::read_to_string(&meta.location).unwrap();
        assert_eq!(
            text,
            "RegNo;Date;Name;Address;City;PostalCode\nHRB 781234;;Muster Solar GmbH;;;\n"
        );
        assert_eq!(meta.bytes_written, text.len());
    }

    #[test]
    fn test_for_file_uses_parent() {
        let storage = LocalStorage::for_file(Path::new("out/regs.jsonl"));
        assert_eq!(storage.path("regs.jsonl"), Path::new("out/regs.jsonl"));

        let storage = LocalStorage::for_file(Path::new("regs.jsonl"));
        assert_eq!(storage.path("regs.jsonl"), Path::new("./regs.jsonl"));
    }
}
