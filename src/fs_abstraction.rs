//! Filesystem abstraction for the persistence collaborator.
//!
//! Whitelist files are read and generated lists written through the
//! [`FileSystem`] trait so that tests can substitute a mock. Uses mockall for
//! automatic mock generation in test builds.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// How [`FileSystem::write`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Overwrite,
}

/// Trait abstracting filesystem operations for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use hostsfeed::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_read_to_string()
///     .returning(|_| Ok("google.com\n".to_string()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem {
    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write text to a file, creating it if it doesn't exist.
    fn write(&self, path: &Path, contents: &str, mode: WriteMode) -> io::Result<()>;

    /// Remove a file. Removing a missing file is not an error.
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Production implementation over `std::fs`.
///
/// Overwrites go through a temporary file in the target directory and an
/// atomic rename, so readers never observe a half-written list.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str, mode: WriteMode) -> io::Result<()> {
        match mode {
            WriteMode::Append => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(contents.as_bytes())
            }
            WriteMode::Overwrite => {
                let parent = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
                temp_file.write_all(contents.as_bytes())?;
                temp_file.as_file().sync_all()?;
                temp_file.persist(path).map_err(|e| e.error)?;
                Ok(())
            }
        }
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_write_append_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("hi");
        let fs = RealFileSystem;

        fs.write(&file_path, "Hello, World!", WriteMode::Append).unwrap();
        assert_eq!(fs.read_to_string(&file_path).unwrap(), "Hello, World!");

        fs.write(&file_path, "This is a blacklist!", WriteMode::Append)
            .unwrap();
        assert_eq!(
            fs.read_to_string(&file_path).unwrap(),
            "Hello, World!This is a blacklist!"
        );

        fs.write(&file_path, "Overwritten", WriteMode::Overwrite)
            .unwrap();
        assert_eq!(fs.read_to_string(&file_path).unwrap(), "Overwritten");
    }

    #[test]
    fn test_real_fs_overwrite_creates() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("new.list");
        let fs = RealFileSystem;

        assert!(!fs.exists(&file_path));
        fs.write(&file_path, "a.com\n", WriteMode::Overwrite).unwrap();
        assert!(fs.exists(&file_path));
    }

    #[test]
    fn test_real_fs_delete() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("to_remove");
        let fs = RealFileSystem;

        fs.write(&file_path, "remove me", WriteMode::Overwrite).unwrap();
        fs.delete(&file_path).unwrap();
        assert!(!fs.exists(&file_path));

        // Deleting again is a no-op
        fs.delete(&file_path).unwrap();
    }

    #[test]
    fn test_real_fs_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fs = RealFileSystem;

        let result = fs.read_to_string(&temp_dir.path().join("missing"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_real_fs_global_instance() {
        let fs = real_fs();
        assert!(!fs.exists(Path::new("/nonexistent/path/for/hostsfeed")));
    }

    #[test]
    fn test_mock_fs_write_mode() {
        let mut mock = MockFileSystem::new();
        mock.expect_write()
            .withf(|p, c, m| p == Path::new("/out/domains.list") && c == "a.com\n" && *m == WriteMode::Overwrite)
            .times(1)
            .returning(|_, _, _| Ok(()));

        mock.write(Path::new("/out/domains.list"), "a.com\n", WriteMode::Overwrite)
            .unwrap();
    }
}
