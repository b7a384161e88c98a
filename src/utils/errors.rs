//! Custom error types for the backup core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Backup session already running")]
    AlreadyRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Unsafe archive entry name: {0}")]
    UnsafeEntryName(String),
}

pub type Result<T> = std::result::Result<T, BackupError>;
