//! Logging for ez.
use anyhow::Context;
use ez_core::get_data_dir;
use std::io::LineWriter;
use std::sync::Mutex;

/// Sets up file-based logging under the user data directory.
///
/// The log file lives at `<data_dir>/ez.log`; when it grows past 100KB the
/// old file is rotated to `ez.log.old` on startup.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_path = data_dir.join("ez.log");

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;
        if metadata.len() > 100 * 1024 {
            // 100KB
            let backup_path = data_dir.join("ez.log.old");
            if backup_path.exists() {
                std::fs::remove_file(&backup_path)?;
            }
            std::fs::rename(&log_path, backup_path)?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // Ensure the logs are flushed after every line
    let writer = Mutex::new(LineWriter::new(log_file));

    tracing_subscriber::fmt()
        .with_env_filter("ez=debug,ez_core=debug,rustyline=info")
        .with_writer(writer)
        .with_ansi(false) // Disable ANSI escape codes for file logging
        .init();
    Ok(())
}
