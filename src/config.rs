//! Configuration for a backup session.
//!
//! Loads configuration from a TOML file or is built directly by the caller.
//! A config is immutable for the lifetime of one running session.

use crate::utils::errors::BackupError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory tree to back up
    pub source_root: PathBuf,

    /// Directory that receives the timestamped archives
    pub backup_root: PathBuf,

    /// Minutes between backup passes
    pub interval_minutes: u64,
}

impl BackupConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BackupConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check that the config can start a session.
    ///
    /// The source must already exist and be a directory; the backup root is
    /// created on demand by the session and is not checked here.
    pub fn validate(&self) -> Result<(), BackupError> {
        if self.interval_minutes == 0 {
            return Err(BackupError::InvalidConfig(
                "interval_minutes must be greater than zero".to_string(),
            ));
        }

        if !self.source_root.is_dir() {
            return Err(BackupError::InvalidConfig(format!(
                "source root is not a directory: {}",
                self.source_root.display()
            )));
        }

        Ok(())
    }

    /// Interval between backup passes
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml() {
        let config: BackupConfig = toml::from_str(
            r#"
            source_root = "/data/docs"
            backup_root = "/data/backups"
            interval_minutes = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.source_root, PathBuf::from("/data/docs"));
        assert_eq!(config.backup_root, PathBuf::from("/data/backups"));
        assert_eq!(config.interval_minutes, 15);
        assert_eq!(config.interval(), Duration::from_secs(900));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig {
            source_root: temp_dir.path().to_path_buf(),
            backup_root: temp_dir.path().join("backups"),
            interval_minutes: 0,
        };

        assert!(matches!(
            config.validate(),
            Err(BackupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig {
            source_root: temp_dir.path().join("does-not-exist"),
            backup_root: temp_dir.path().join("backups"),
            interval_minutes: 5,
        };

        assert!(matches!(
            config.validate(),
            Err(BackupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_file_as_source() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("plain.txt");
        std::fs::write(&file_path, b"not a directory").unwrap();

        let config = BackupConfig {
            source_root: file_path,
            backup_root: temp_dir.path().join("backups"),
            interval_minutes: 5,
        };

        assert!(matches!(
            config.validate(),
            Err(BackupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig {
            source_root: temp_dir.path().to_path_buf(),
            backup_root: temp_dir.path().join("backups"),
            interval_minutes: 1,
        };

        assert!(config.validate().is_ok());
    }
}
