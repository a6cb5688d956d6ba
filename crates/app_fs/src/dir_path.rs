//! DirectoryPath - validated handle to an existing directory

use crate::{FsError, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// An absolute, lexically normalized path that referred to an existing
/// directory when it was built.
///
/// The check is a snapshot: the directory may vanish afterwards, which is
/// why every navigation resolves a fresh `DirectoryPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryPath {
    raw: PathBuf,
}

impl DirectoryPath {
    /// Resolve `path` against the working directory and check that it is a directory
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = normalize(&absolute(path.as_ref())?);

        let metadata = std::fs::metadata(&raw).map_err(|e| FsError::from_io(&raw, e))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(raw));
        }

        Ok(Self { raw })
    }

    /// The process working directory
    pub fn current() -> Result<Self> {
        Self::resolve(std::env::current_dir()?)
    }

    /// Get the path for file system operations
    pub fn as_path(&self) -> &Path {
        &self.raw
    }

    /// Get the path (owned)
    pub fn to_path_buf(&self) -> PathBuf {
        self.raw.clone()
    }

    /// Join a child name or relative path. Absolute input replaces the base.
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.raw.join(path)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolve `.` and `..` without touching the disk
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            _ => normalized.push(component),
        }
    }
    normalized
}

impl AsRef<Path> for DirectoryPath {
    fn as_ref(&self) -> &Path {
        &self.raw
    }
}

impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_normalizes() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();

        let dotted = temp.path().join("sub").join("..").join(".").join("sub");
        let dir = DirectoryPath::resolve(&dotted).unwrap();
        assert_eq!(dir.as_path(), temp.path().join("sub"));
    }

    #[test]
    fn test_resolve_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(matches!(DirectoryPath::resolve(&file), Err(FsError::NotADirectory(_))));
        assert!(matches!(
            DirectoryPath::resolve(temp.path().join("missing")),
            Err(FsError::NotFound(_))
        ));
    }
}
