//! File system helpers for staging and finalizing the build tree.
//!
//! All write paths create missing parent directories; directory removal is
//! idempotent. Recursive copies preserve symlinks.

use crate::error::{Error, ErrorExt, Result};
use std::io;
use std::path::Path;
use tokio::fs;

/// Write text to a file, creating parent directories first.
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating parent directory", parent)?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing file", path)
}

/// Copy a regular file, creating parent directories of the destination.
///
/// Fails if the source does not exist or is a directory.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::Fs {
            context: "copying file",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
    }
    if !from.is_file() {
        return Err(Error::Fs {
            context: "copying file",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating parent directory", parent)?;
    }
    fs::copy(from, to).await.fs_context("copying file", to)?;
    Ok(())
}

/// Recursively copy a directory, preserving structure and symlinks.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::Fs {
            context: "copying directory",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // walkdir iteration is blocking work
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                symlink(&target, &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| io::Error::other(format!("directory copy task panicked: {e}")))?
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot create symlink {}", link.display()),
    ))
}

/// Remove the contents of a directory, leaving the directory itself.
///
/// Files are unlinked, sub-directories removed recursively. Nothing to do
/// if the directory does not exist.
pub async fn clean_dir(path: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::Fs {
            context: "cleaning directory",
            path: path.to_path_buf(),
            error: e,
        }),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("cleaning directory", path)?
    {
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .fs_context("cleaning directory", &entry_path)?;
        if file_type.is_dir() {
            fs::remove_dir_all(&entry_path)
                .await
                .fs_context("removing directory", &entry_path)?;
        } else {
            fs::remove_file(&entry_path)
                .await
                .fs_context("removing file", &entry_path)?;
        }
    }

    Ok(())
}

/// Create a directory (and parents) with mode 0755.
pub async fn create_dir_0755(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)?;
    set_mode(path, 0o755).await
}

/// Mark a staged script executable (mode 0755).
pub async fn make_executable(path: &Path) -> Result<()> {
    set_mode(path, 0o755).await
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("setting permissions", path)
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_file(&path, "hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[tokio::test]
    async fn clean_dir_removes_contents_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        clean_dir(dir.path()).await.unwrap();
        assert!(dir.path().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn clean_dir_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        clean_dir(&dir.path().join("nope")).await.unwrap();
    }

    #[tokio::test]
    async fn copy_dir_preserves_structure() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("nested/file.txt"), "data").unwrap();

        let dst = dir.path().join("dst");
        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dst.join("nested/file.txt")).unwrap(),
            "data"
        );
    }

    #[tokio::test]
    async fn copy_file_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
