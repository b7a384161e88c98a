//! Archive restoration.
//!
//! Stateless extraction of a backup archive into a destination directory,
//! independent of any running backup session.

use crate::utils::errors::{BackupError, Result};
use crate::LogSink;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Extract every entry of `archive_path` into `destination`.
///
/// Entries are processed in stored order; intermediate directories are
/// created as needed and existing files are overwritten. The first failing
/// entry aborts the restore, leaving earlier entries in place. Entry names
/// that would resolve outside `destination` abort with
/// [`BackupError::UnsafeEntryName`].
///
/// Safe to call concurrently for different archive/destination pairs.
pub fn restore_archive(
    archive_path: &Path,
    destination: &Path,
    log: &LogSink,
) -> Result<usize> {
    match extract_entries(archive_path, destination, log) {
        Ok(restored) => {
            log(format!(
                "Restore complete: {} file(s) extracted to {}",
                restored,
                destination.display()
            ));
            Ok(restored)
        }
        Err(e) => {
            log(format!("Restore failed: {e}"));
            Err(e)
        }
    }
}

fn extract_entries(archive_path: &Path, destination: &Path, log: &LogSink) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    std::fs::create_dir_all(destination)?;

    let mut restored = 0usize;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let relative = entry_relative_path(entry.name())?;
        let target = destination.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut output = File::create(&target)?;
        io::copy(&mut entry, &mut output)?;
        restored += 1;

        log(format!("Restored {}", relative.display()));
    }

    Ok(restored)
}

/// Validate an entry name and convert it to a relative path.
///
/// Rejects names that are absolute or contain parent-directory components,
/// so no entry can write outside the restore destination.
fn entry_relative_path(name: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(BackupError::UnsafeEntryName(name.to_string()));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(BackupError::UnsafeEntryName(name.to_string()));
    }

    Ok(relative)
}
