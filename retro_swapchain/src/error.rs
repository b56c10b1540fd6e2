//! Error types for the libretro swapchain bridge
//!
//! This module defines the error taxonomy shared by the capability prober,
//! the format/mode selector, the image pool and the swapchain controller.

use std::fmt;

/// Result type for swapchain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Swapchain errors
///
/// Every variant is fatal for the current swapchain: there is no partial
/// recovery path, the frontend has to run the create cycle again.
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (a Vulkan call returned a failure code)
    BackendError(String),

    /// Out of device or host memory while building the image pool
    OutOfMemory,

    /// The presentation target cannot be satisfied (missing surface, no
    /// acceptable format, no device-local memory type, sync-slot ceiling exceeded)
    Configuration(String),

    /// Initialization failed (frontend interface missing or incompatible)
    InitializationFailed(String),

    /// An operation was called in a state that does not allow it
    /// (present before acquire, acquire without a pool, ...)
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Whether the error reports an unsatisfiable presentation target
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
