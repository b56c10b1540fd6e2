/// Capability prober - one-shot snapshot of what a surface supports

use ash::vk;
use ash::vk::Handle;

use crate::error::{Error, Result};
use crate::swapchain::SurfaceProber;
use crate::{retro_critical, retro_debug};

/// Everything the selector needs to know about a surface
#[derive(Debug, Clone)]
pub struct SurfaceSupport {
    /// Supported {format, color space} pairs, in driver order
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes
    pub present_modes: Vec<vk::PresentModeKHR>,
    /// Surface capabilities
    pub capabilities: vk::SurfaceCapabilitiesKHR,
}

impl SurfaceSupport {
    /// Query formats, present modes and capabilities of `surface`
    ///
    /// Pure query. The only failure is an invalid (or missing) surface, which
    /// is a fatal configuration error: the swapchain cannot exist without it.
    pub fn query(prober: &dyn SurfaceProber, surface: vk::SurfaceKHR) -> Result<Self> {
        if surface.is_null() {
            retro_critical!("retro::swapchain::prober", "No surface to present to");
            return Err(Error::Configuration("missing surface".to_string()));
        }

        let formats = prober.surface_formats(surface).map_err(|e| {
            retro_critical!("retro::swapchain::prober", "Failed to query surface formats: {:?}", e);
            Error::Configuration(format!("surface formats unavailable: {:?}", e))
        })?;

        let present_modes = prober.present_modes(surface).map_err(|e| {
            retro_critical!("retro::swapchain::prober", "Failed to query present modes: {:?}", e);
            Error::Configuration(format!("present modes unavailable: {:?}", e))
        })?;

        let capabilities = prober.surface_capabilities(surface).map_err(|e| {
            retro_critical!("retro::swapchain::prober", "Failed to query surface capabilities: {:?}", e);
            Error::Configuration(format!("surface capabilities unavailable: {:?}", e))
        })?;

        retro_debug!(
            "retro::swapchain::prober",
            "Surface supports {} formats, present modes {:?}, images {}..{}, current extent {}x{}",
            formats.len(),
            present_modes,
            capabilities.min_image_count,
            capabilities.max_image_count,
            capabilities.current_extent.width,
            capabilities.current_extent.height
        );

        Ok(Self {
            formats,
            present_modes,
            capabilities,
        })
    }

    /// Whether `mode` is in the supported list
    pub fn supports_present_mode(&self, mode: vk::PresentModeKHR) -> bool {
        self.present_modes.contains(&mode)
    }
}

#[cfg(test)]
#[path = "capability_prober_tests.rs"]
mod tests;
