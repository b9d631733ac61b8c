use crate::app::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, Naming};
use std::path::PathBuf;

/// Initialize the logger for the application.
///
/// Everything goes to a file; the terminal belongs to the picker, so there
/// is no console output.
pub fn init_logger(config: &LoggingConfig) -> Result<(), FlexiLoggerError> {
    let mut logger = Logger::try_with_str(config.level.to_lowercase())?;

    logger = logger
        .log_to_file(
            FileSpec::default()
                .directory(get_log_directory())
                .suppress_timestamp(),
        )
        .format_for_files(custom_log_format)
        .use_utc();

    if config.append_to_file {
        logger = logger.append();
    }

    if config.rotate_logs {
        logger = logger.rotate(
            Criterion::Size(config.rotation_size_mb * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(config.keep_log_files as usize),
        );
    }

    logger.start()?;
    log::info!("Logger initialized with level: {}", config.level);
    log::info!("Log file location: {}", get_log_file_path().display());

    Ok(())
}

/// Get the platform-specific log directory
pub fn get_log_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".local/share"))
                .unwrap_or_else(|| PathBuf::from("."))
        })
        .join("fzmpd/logs")
}

/// Get the full path to the main log file
pub fn get_log_file_path() -> PathBuf {
    get_log_directory().join("fzmpd.log")
}

/// Custom log format for file output
fn custom_log_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}:{}] {}",
        now.now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Ensure log directory exists
pub fn ensure_log_directory() -> color_eyre::Result<()> {
    let log_dir = get_log_directory();
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }
    Ok(())
}

/// Log application startup information
pub fn log_startup_info() {
    log::info!("=== fzmpd starting ===");
    log::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    log::info!("OS: {}", std::env::consts::OS);
}

/// Log application shutdown information
pub fn log_shutdown_info(exit_code: i32) {
    log::info!("=== fzmpd exiting with code {} ===", exit_code);
}

/// Log MPD connection attempts
pub fn log_mpd_connection(address: &str, success: bool, error: Option<&str>) {
    if success {
        log::info!("Successfully connected to MPD at: {}", address);
    } else {
        log::error!(
            "Failed to connect to MPD at: {} - {}",
            address,
            error.unwrap_or("Unknown error")
        );
    }
}

/// Log MPD command execution
pub fn log_mpd_command(command: &str, success: bool, error: Option<&str>) {
    if success {
        log::debug!("MPD command executed successfully: {}", command);
    } else {
        log::warn!(
            "MPD command failed: {} - {}",
            command,
            error.unwrap_or("Unknown error")
        );
    }
}

/// Report startup warnings. They must reach the user even when file
/// logging is off, so without a logger they go to stderr (no screen is
/// shown yet at that point).
pub fn report_warnings(logger_active: bool, warnings: &[String]) {
    for warning in warnings {
        if logger_active {
            log::warn!("{}", warning);
        } else {
            eprintln!("fzmpd: warning: {}", warning);
        }
    }
}

/// Log configuration loading
pub fn log_config_loading(config_path: &std::path::Path, created: bool) {
    if created {
        log::info!("Created default config file at: {}", config_path.display());
    } else {
        log::info!("Loaded config file from: {}", config_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_reported_without_an_installed_logger() {
        // Both branches must be safe before (or without) logger init
        let warnings = vec!["something looks off".to_string()];
        report_warnings(false, &warnings);
        report_warnings(true, &warnings);
        report_warnings(false, &[]);
    }
}
