//! Filesystem primitives used during plan building

use std::path::Path;

/// Read-only filesystem queries
///
/// Plan building never writes; only the renderer does.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    /// True when `path` is a file, or a directory with at least one entry
    fn has_entries(&self, path: &Path) -> bool;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn has_entries(&self, path: &Path) -> bool {
        if path.is_file() {
            return true;
        }
        std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }
}

/// In-memory filesystem for plan tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryFilesystem {
    files: std::collections::HashSet<std::path::PathBuf>,
}

#[cfg(test)]
impl MemoryFilesystem {
    pub(crate) fn with_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }
}

#[cfg(test)]
impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.starts_with(path))
    }

    fn has_entries(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_filesystem_has_entries() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem;

        assert!(fs.exists(dir.path()));
        assert!(!fs.has_entries(dir.path()));
        assert!(!fs.has_entries(&dir.path().join("missing")));

        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        assert!(fs.has_entries(dir.path()));
        assert!(fs.has_entries(&dir.path().join("a.txt")));
    }

    #[test]
    fn test_memory_filesystem_directories() {
        let fs = MemoryFilesystem::default().with_file("/srv/app/Controller/PostController.php");
        assert!(fs.exists(Path::new("/srv/app/Controller/PostController.php")));
        assert!(fs.exists(Path::new("/srv/app/Controller")));
        assert!(fs.has_entries(Path::new("/srv/app")));
        assert!(!fs.exists(Path::new("/srv/other")));
    }
}
