//! Directory traversal and candidate selection.
//!
//! Walks a source tree and selects the regular files whose modification time
//! is newer than the last completed backup pass.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A file selected for inclusion in the current backup pass.
///
/// Computed fresh on every pass; never persisted.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Full path to the file
    pub path: PathBuf,

    /// Path relative to the source root
    pub relative_path: PathBuf,

    /// Modification time reported by the filesystem
    pub modified: SystemTime,
}

/// Walk a source tree and collect the files modified after `since`.
///
/// Only regular files qualify; directories, symlinks and special files are
/// skipped. With `since = None` every regular file is selected. A file whose
/// modification time equals `since` exactly is not selected.
///
/// # Arguments
/// * `root` - Root directory to start walking from
/// * `since` - Modification-time threshold, or `None` for "everything"
///
/// # Returns
/// * `Ok(Vec<FileCandidate>)` - Candidates in traversal order
/// * `Err(io::Error)` - If the tree cannot be read
pub fn scan_modified_since(
    root: &Path,
    since: Option<SystemTime>,
) -> std::io::Result<Vec<FileCandidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;

        // Regular files only: symlinks and special files never qualify
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata()?;
        let modified = metadata.modified()?;

        if let Some(watermark) = since {
            if modified <= watermark {
                continue;
            }
        }

        let path = entry.path().to_path_buf();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        candidates.push(FileCandidate {
            path,
            relative_path,
            modified,
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_scan_empty_directory() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let candidates = scan_modified_since(temp_dir.path(), None)?;
        assert_eq!(candidates.len(), 0);
        Ok(())
    }

    #[test]
    fn test_scan_collects_all_without_watermark() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;

        fs::create_dir(temp_dir.path().join("subdir"))?;
        fs::write(temp_dir.path().join("file1.txt"), b"content1")?;
        fs::write(temp_dir.path().join("subdir/file2.txt"), b"content2")?;

        let mut candidates = scan_modified_since(temp_dir.path(), None)?;
        candidates.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].relative_path, PathBuf::from("file1.txt"));
        assert_eq!(
            candidates[1].relative_path,
            PathBuf::from("subdir/file2.txt")
        );
        Ok(())
    }

    #[test]
    fn test_scan_includes_zero_byte_files() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("empty.txt"), b"")?;

        let candidates = scan_modified_since(temp_dir.path(), None)?;
        assert_eq!(candidates.len(), 1);
        Ok(())
    }

    #[test]
    fn test_scan_excludes_older_files() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("old.txt"), b"old")?;

        let mtime = fs::metadata(temp_dir.path().join("old.txt"))?.modified()?;
        let later = mtime + Duration::from_secs(60);

        let candidates = scan_modified_since(temp_dir.path(), Some(later))?;
        assert_eq!(candidates.len(), 0);
        Ok(())
    }

    #[test]
    fn test_scan_excludes_mtime_equal_to_watermark() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("file.txt"), b"x")?;

        // Threshold comparison is strictly-greater
        let mtime = fs::metadata(temp_dir.path().join("file.txt"))?.modified()?;

        let candidates = scan_modified_since(temp_dir.path(), Some(mtime))?;
        assert_eq!(candidates.len(), 0);
        Ok(())
    }

    #[test]
    fn test_scan_includes_files_newer_than_watermark() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("file.txt"), b"x")?;

        let mtime = fs::metadata(temp_dir.path().join("file.txt"))?.modified()?;
        let earlier = mtime - Duration::from_secs(60);

        let candidates = scan_modified_since(temp_dir.path(), Some(earlier))?;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].relative_path, PathBuf::from("file.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_excludes_symlinks() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("real.txt"), b"real")?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("real.txt"),
            temp_dir.path().join("link.txt"),
        )?;

        let candidates = scan_modified_since(temp_dir.path(), None)?;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].relative_path, PathBuf::from("real.txt"));
        Ok(())
    }
}
