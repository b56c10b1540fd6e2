/// Swapchain configuration
///
/// The two user-facing settings that bias present-mode selection. They are
/// read-only inputs supplied by the core's option layer.

/// Core option key for vsync ("enabled" / "disabled")
pub const VSYNC_VARIABLE: &str = "citra_use_vsync";

/// Core option key for the frame-rate limit, in percent of native speed
pub const FRAME_LIMIT_VARIABLE: &str = "citra_frame_limit";

/// Swapchain configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainConfig {
    /// Wait for vertical blank before presenting
    pub use_vsync: bool,
    /// Frame-rate limit in percent (100 = native speed)
    pub frame_limit: u32,
}

impl Default for SwapchainConfig {
    fn default() -> Self {
        Self {
            use_vsync: true,
            frame_limit: 100,
        }
    }
}

impl SwapchainConfig {
    /// Set the vsync flag
    pub fn with_vsync(mut self, use_vsync: bool) -> Self {
        self.use_vsync = use_vsync;
        self
    }

    /// Set the frame-rate limit (percent)
    pub fn with_frame_limit(mut self, frame_limit: u32) -> Self {
        self.frame_limit = frame_limit;
        self
    }

    /// Whether the frame limiter lets the core run faster than native speed
    pub fn is_uncapped(&self) -> bool {
        self.frame_limit > 100
    }

    /// Build a configuration from core option variables
    ///
    /// `fetch` returns the frontend's value for a key, or `None` when the
    /// frontend does not know it. Missing keys use the defaults. A vsync value
    /// other than `"enabled"` turns vsync off; a malformed frame limit falls
    /// back to 100.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_swapchain::retro::SwapchainConfig;
    ///
    /// let config = SwapchainConfig::from_variables(|key| match key {
    ///     "citra_use_vsync" => Some("disabled".to_string()),
    ///     "citra_frame_limit" => Some("200".to_string()),
    ///     _ => None,
    /// });
    /// assert!(!config.use_vsync);
    /// assert_eq!(config.frame_limit, 200);
    /// ```
    pub fn from_variables<F>(fetch: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Boolean options follow the frontend convention: unset means the
        // default, anything set other than "enabled" is off.
        let use_vsync = match fetch(VSYNC_VARIABLE) {
            Some(value) => value.trim() == "enabled",
            None => defaults.use_vsync,
        };

        let frame_limit = fetch(FRAME_LIMIT_VARIABLE)
            .and_then(|value| value.trim().trim_end_matches('%').parse::<u32>().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(defaults.frame_limit);

        Self { use_vsync, frame_limit }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
