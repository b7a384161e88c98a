//! dirsnap - Main entry point
//!
//! Thin command-line shell over the backup core: wires flags and the log
//! sink, then drives start/stop/restore.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dirsnap::{restore_archive, utils, BackupConfig, BackupScheduler, LogSink};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scheduled backups until interrupted
    Run {
        /// Path to a TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory tree to back up (overrides config)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Directory that receives the archives (overrides config)
        #[arg(long)]
        backup_dir: Option<PathBuf>,

        /// Minutes between backup passes (overrides config)
        #[arg(long)]
        interval_minutes: Option<u64>,
    },

    /// Restore an archive into a destination directory
    Restore {
        /// Archive to extract
        archive: PathBuf,

        /// Destination directory
        destination: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    utils::logger::init(&args.log_level)?;

    match args.command {
        Command::Run {
            config,
            source,
            backup_dir,
            interval_minutes,
        } => run(config, source, backup_dir, interval_minutes).await,
        Command::Restore {
            archive,
            destination,
        } => {
            let log = log_sink();
            let restored = tokio::task::spawn_blocking(move || {
                restore_archive(&archive, &destination, &log)
            })
            .await??;
            tracing::info!(restored, "Restore finished");
            Ok(())
        }
    }
}

async fn run(
    config_file: Option<PathBuf>,
    source: Option<PathBuf>,
    backup_dir: Option<PathBuf>,
    interval_minutes: Option<u64>,
) -> Result<()> {
    let base = match config_file {
        Some(path) => Some(BackupConfig::from_file(&path)?),
        None => None,
    };

    let source_root = source
        .or_else(|| base.as_ref().map(|c| c.source_root.clone()))
        .ok_or_else(|| anyhow::anyhow!("--source or a config file is required"))?;
    let backup_root = backup_dir
        .or_else(|| base.as_ref().map(|c| c.backup_root.clone()))
        .ok_or_else(|| anyhow::anyhow!("--backup-dir or a config file is required"))?;
    let interval_minutes = interval_minutes
        .or_else(|| base.as_ref().map(|c| c.interval_minutes))
        .unwrap_or(60);

    let config = BackupConfig {
        source_root,
        backup_root,
        interval_minutes,
    };

    let scheduler = BackupScheduler::new();
    scheduler.start(config, log_sink()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, stopping scheduled backups");
    scheduler.stop().await;

    Ok(())
}

/// Forward core progress lines to the log output.
fn log_sink() -> LogSink {
    Arc::new(|message: String| tracing::info!("{message}"))
}
