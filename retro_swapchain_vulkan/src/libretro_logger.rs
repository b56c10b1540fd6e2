/// FrontendLogger - routes swapchain logs to the frontend's log interface

use retro_swapchain::retro::log::{LogEntry, LogSeverity, Logger};
use std::ffi::CString;
use std::os::raw::c_char;

use crate::libretro::{retro_log_level, retro_log_printf_t};

/// Map a log severity to the closest libretro level
pub fn log_level(severity: LogSeverity) -> retro_log_level {
    match severity {
        LogSeverity::Trace | LogSeverity::Debug => retro_log_level::RETRO_LOG_DEBUG,
        LogSeverity::Info => retro_log_level::RETRO_LOG_INFO,
        LogSeverity::Warn => retro_log_level::RETRO_LOG_WARN,
        LogSeverity::Error | LogSeverity::Critical => retro_log_level::RETRO_LOG_ERROR,
    }
}

/// One line as the frontend prints it, newline included
pub fn format_entry(entry: &LogEntry) -> String {
    match (entry.file, entry.line) {
        (Some(file), Some(line)) => format!("{} @ {}:{}: {}\n", entry.source, file, line, entry.message),
        _ => format!("{}: {}\n", entry.source, entry.message),
    }
}

/// Logger backed by `retro_log_printf_t`
///
/// Install it with `Runtime::set_logger` once the frontend answered
/// `RETRO_ENVIRONMENT_GET_LOG_INTERFACE`.
pub struct FrontendLogger {
    callback: unsafe extern "C" fn(retro_log_level, *const c_char, ...),
    min_severity: LogSeverity,
}

impl FrontendLogger {
    /// Wrap the frontend's callback; `None` when the frontend has no log interface
    pub fn new(callback: retro_log_printf_t) -> Option<Self> {
        callback.map(|callback| Self {
            callback,
            min_severity: LogSeverity::Debug,
        })
    }

    /// Drop entries below `severity`
    pub fn with_min_severity(mut self, severity: LogSeverity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Lowest severity forwarded to the frontend
    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }
}

impl Logger for FrontendLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.severity < self.min_severity {
            return;
        }

        // Interior NULs would truncate the line on the C side
        let line = format_entry(entry).replace('\0', " ");
        let Ok(line) = CString::new(line) else {
            return;
        };

        unsafe {
            (self.callback)(log_level(entry.severity), c"%s".as_ptr(), line.as_ptr());
        }
    }
}

#[cfg(test)]
#[path = "libretro_logger_tests.rs"]
mod tests;
