use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes files below a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let target = full_path.clone();
        let bytes = data.to_vec();

        tokio::task::spawn_blocking(move || write_atomically(&target, &bytes))
            .await
            .map_err(std::io::Error::other)??;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

/// Writes into a uniquely named file next to `path`, then renames it over
/// `path`. The temporary file is removed on every failure path.
fn write_atomically(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_write_file_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("dist/nested/list.json", b"[]").await.unwrap();

        let written = std::fs::read(temp_dir.path().join("dist/nested/list.json")).unwrap();
        assert_eq!(written, b"[]");
        assert_eq!(entries(&temp_dir.path().join("dist/nested")), vec!["list.json"]);
    }

    #[tokio::test]
    async fn test_write_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("list.json", b"[1]").await.unwrap();
        storage.write_file("list.json", b"[2]").await.unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("list.json")).unwrap();
        assert_eq!(written, "[2]");
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_temporary_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("list.json")).unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(storage.write_file("list.json", b"[]").await.is_err());
        assert_eq!(entries(temp_dir.path()), vec!["list.json"]);
        assert!(temp_dir.path().join("list.json").is_dir());
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_same_path() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let (first, second) = tokio::join!(
            storage.write_file("list.json", b"[1]"),
            storage.write_file("list.json", b"[2]"),
        );
        first.unwrap();
        second.unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("list.json")).unwrap();
        assert!(written == "[1]" || written == "[2]");
        assert_eq!(entries(temp_dir.path()), vec!["list.json"]);
    }

    #[test]
    fn test_absolute_paths_ignore_base() {
        let storage = LocalStorage::new("/base");
        assert_eq!(storage.resolve("/tmp/out.json"), PathBuf::from("/tmp/out.json"));
        assert_eq!(storage.resolve("dist/out.json"), PathBuf::from("/base/dist/out.json"));
    }
}
