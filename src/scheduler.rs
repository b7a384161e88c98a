//! Periodic backup scheduling.
//!
//! Owns the repeating timer that drives backup passes and the in-memory
//! watermark that selects candidates. The watermark lives only for the
//! lifetime of one running session; a fresh `start` always begins from the
//! "never backed up" state.

use crate::archiver;
use crate::config::BackupConfig;
use crate::utils::errors::{BackupError, Result};
use crate::LogSink;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Drives backup passes at a fixed interval.
///
/// A pass fires immediately on `start`, then every `interval_minutes`.
/// Passes never overlap: the tick loop awaits each pass before polling the
/// next tick, and ticks that come due while a pass is still running are
/// delayed until it finishes rather than skipped or stacked.
pub struct BackupScheduler {
    running: Mutex<Option<RunningSession>>,
}

struct RunningSession {
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl BackupScheduler {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(None),
        }
    }

    /// Begin scheduled backups.
    ///
    /// Validates the config, creates the backup root if missing, and spawns
    /// the tick loop. Fails with [`BackupError::AlreadyRunning`] if a
    /// session is already active on this scheduler, and with
    /// [`BackupError::InvalidConfig`] before any pass runs if the config is
    /// unusable.
    pub async fn start(&self, config: BackupConfig, log: LogSink) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(BackupError::AlreadyRunning);
        }

        config.validate()?;
        std::fs::create_dir_all(&config.backup_root).map_err(|e| {
            BackupError::InvalidConfig(format!(
                "cannot create backup root {}: {e}",
                config.backup_root.display()
            ))
        })?;

        info!(
            source = %config.source_root.display(),
            backup = %config.backup_root.display(),
            interval_minutes = config.interval_minutes,
            "Backup session started"
        );

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_loop(config, log, cancel.clone()));

        *running = Some(RunningSession {
            cancel,
            _task: task,
        });
        Ok(())
    }

    /// Halt scheduling.
    ///
    /// Cancels future ticks; a pass already in flight completes (or fails)
    /// independently. No new pass can start once this returns. Calling
    /// `stop` with no active session is a no-op.
    pub async fn stop(&self) {
        if let Some(session) = self.running.lock().await.take() {
            session.cancel.cancel();
            info!("Backup session stopped");
        }
    }

    /// Whether a session is currently active
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}

impl Default for BackupScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// The tick loop: one iteration per backup pass.
///
/// The watermark is confined to this task; a pass advances it only when the
/// pass completes without error, so a failed pass retries the same window on
/// its next natural tick.
async fn run_loop(config: BackupConfig, log: LogSink, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(config.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut watermark: Option<SystemTime> = None;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let pass_config = config.clone();
        let pass_log = log.clone();
        let since = watermark;

        let outcome = tokio::task::spawn_blocking(move || {
            archiver::run_pass(&pass_config, since, &pass_log)
        })
        .await;

        match outcome {
            Ok(Ok(summary)) => {
                debug!(
                    archived = summary.archived,
                    archive = ?summary.archive_path,
                    "Backup pass completed"
                );
                watermark = Some(summary.started_at);
            }
            Ok(Err(e)) => {
                error!(error = %e, "Backup pass failed");
                log(format!("Backup pass failed: {e}"));
            }
            Err(e) => {
                error!(error = %e, "Backup pass panicked");
                log(format!("Backup pass failed: {e}"));
            }
        }
    }

    debug!("Backup tick loop exited");
}
