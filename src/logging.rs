use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Initialize logging based on whether we're running tests or an application
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init_logging() {
    if cfg!(test) {
        init_test_logging();
    } else {
        init_file_logging();
    }
}

/// Initialize logging for tests (output to stdout)
fn init_test_logging() {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    let _ = builder.try_init();
}

/// Initialize logging for applications embedding the client (output to file)
fn init_file_logging() {
    let log_dir = get_log_directory();

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory: {}", e);
        return;
    }

    let log_file = log_dir.join("unity_mcp_client.log");

    let target = match fs::OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file.display(), e);
            return;
        }
    };

    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Pipe(target))
        .filter_level(LevelFilter::Info)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}:{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

    if builder.try_init().is_ok() {
        crate::info_log!("Logging initialized to file: {}", log_file.display());
    }
}

/// Get the appropriate log directory based on the operating system
fn get_log_directory() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("UnityMcp")
    } else {
        // No local data directory on this platform
        PathBuf::from("./logs")
    }
}

/// Macro for debug logging
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

/// Macro for info logging
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

/// Macro for warning logging
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

/// Macro for error logging
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}
