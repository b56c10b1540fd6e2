//! Logging for the swapchain bridge
//!
//! This module provides a pluggable logging system with:
//! - Customizable logger via Logger trait (the Vulkan crate ships a frontend sink)
//! - Severity levels (Trace, Debug, Info, Warn, Error, Critical)
//! - Colored console output by default
//! - File and line information for ERROR and CRITICAL logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route swapchain diagnostics somewhere else than
/// stdout (the libretro frontend log, a file, a test capture buffer...).
///
/// # Example
///
/// ```no_run
/// use retro_swapchain::retro::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "retro::swapchain", "retro::vulkan::device")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR and CRITICAL logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR and CRITICAL logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Degraded-mode warnings (a safe substitute was chosen)
    Warn,

    /// Errors with file:line details
    Error,

    /// Fatal configuration or object-creation failures, rendering stops
    Critical,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
            LogSeverity::Critical => "CRIT ",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error/Critical: `[timestamp] [SEVERITY] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
            LogSeverity::Critical => label.white().on_red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! retro_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log(
            $crate::retro::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! retro_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log(
            $crate::retro::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
///
/// # Example
///
/// ```no_run
/// retro_swapchain::retro_info!("retro::swapchain", "Created {} images", 3);
/// ```
#[macro_export]
macro_rules! retro_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log(
            $crate::retro::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (degraded mode, execution continues)
#[macro_export]
macro_rules! retro_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log(
            $crate::retro::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! retro_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log_detailed(
            $crate::retro::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log a CRITICAL message with file:line information
///
/// # Example
///
/// ```no_run
/// retro_swapchain::retro_critical!("retro::swapchain", "Unable to create image view - {:?}", 0);
/// ```
#[macro_export]
macro_rules! retro_critical {
    ($source:expr, $($arg:tt)*) => {
        $crate::retro::Runtime::log_detailed(
            $crate::retro::log::LogSeverity::Critical,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log at CRITICAL severity and build an `Error::BackendError` with the same message
#[macro_export]
macro_rules! retro_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::retro::Runtime::log_detailed(
            $crate::retro::log::LogSeverity::Critical,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::retro::Error::BackendError(message)
    }};
}

/// Log at CRITICAL severity and return an `Error::BackendError` from the current function
#[macro_export]
macro_rules! retro_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::retro_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
