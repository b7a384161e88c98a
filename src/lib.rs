//! Periodic incremental directory backups into timestamped zip archives.
//!
//! A [`BackupScheduler`] fires a backup pass immediately on start and then at
//! a fixed interval: each pass walks the source tree, packs the files that
//! are new or modified since the last completed pass into a
//! `backup_<yyyyMMdd_HHmmss>.zip`, and advances the in-memory watermark.
//! [`restore_archive`] unpacks an archive into a destination directory,
//! recreating relative paths. Progress is reported through an injected
//! [`LogSink`] callback.

pub mod archiver;
pub mod config;
pub mod fs;
pub mod restore;
pub mod scheduler;
pub mod utils;

use std::sync::Arc;

// Re-export commonly used types
pub use config::BackupConfig;
pub use restore::restore_archive;
pub use scheduler::BackupScheduler;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;

/// One-way notification sink for progress and status lines.
///
/// Fire-and-forget: the core never waits on the receiver, and the sink is
/// the only channel the presentation side observes.
pub type LogSink = Arc<dyn Fn(String) + Send + Sync>;
