//! One backup pass: scan the source tree and pack new or modified files
//! into a timestamped zip archive.

use crate::config::BackupConfig;
use crate::fs::walker::{scan_modified_since, FileCandidate};
use crate::utils::errors::Result;
use crate::LogSink;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Outcome of a single backup pass.
#[derive(Debug)]
pub struct PassSummary {
    /// Time the pass started; the session adopts it as the next watermark
    pub started_at: SystemTime,

    /// Number of files written into the archive
    pub archived: usize,

    /// Path of the archive, if one was written
    pub archive_path: Option<PathBuf>,
}

/// Run one backup pass.
///
/// Scans `source_root` for files modified strictly after `watermark` (every
/// regular file when `watermark` is `None`) and writes them into a new
/// `backup_<yyyyMMdd_HHmmss>.zip` under `backup_root`. An empty candidate
/// set writes no archive. The returned summary carries the pass start time;
/// on error no summary is produced and the caller keeps its old watermark.
pub fn run_pass(
    config: &BackupConfig,
    watermark: Option<SystemTime>,
    log: &LogSink,
) -> Result<PassSummary> {
    let started_at = SystemTime::now();

    let candidates = scan_modified_since(&config.source_root, watermark)?;

    if candidates.is_empty() {
        log("No new or modified files; nothing to archive".to_string());
        return Ok(PassSummary {
            started_at,
            archived: 0,
            archive_path: None,
        });
    }

    std::fs::create_dir_all(&config.backup_root)?;

    let stamp: DateTime<Local> = started_at.into();
    let archive_path = config.backup_root.join(archive_file_name(stamp));

    if let Err(e) = write_archive(&archive_path, &candidates) {
        // Leave only complete archives behind
        let _ = std::fs::remove_file(&archive_path);
        return Err(e);
    }

    log(format!(
        "Backed up {} file(s) to {}",
        candidates.len(),
        archive_path.display()
    ));

    Ok(PassSummary {
        started_at,
        archived: candidates.len(),
        archive_path: Some(archive_path),
    })
}

/// Archive file name for a pass started at `at`
fn archive_file_name(at: DateTime<Local>) -> String {
    format!("backup_{}.zip", at.format("%Y%m%d_%H%M%S"))
}

/// Entry name for a candidate: its relative path with forward-slash
/// separators on every platform.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_archive(path: &Path, candidates: &[FileCandidate]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for candidate in candidates {
        writer.start_file(entry_name(&candidate.relative_path), options)?;
        let mut source = File::open(&candidate.path)?;
        io::copy(&mut source, &mut writer)?;
    }

    let mut inner = writer.finish()?;
    inner.flush()?;
    Ok(())
}
