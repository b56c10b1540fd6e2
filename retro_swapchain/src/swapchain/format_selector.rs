/// Format & mode selector - swapchain negotiation policy
///
/// Pure functions over prober results and user configuration. Nothing here
/// touches the device, which keeps every policy branch unit-testable.

use ash::vk;
use std::fmt;

use crate::config::SwapchainConfig;
use crate::error::{Error, Result};
use crate::swapchain::SurfaceSupport;
use crate::{retro_critical, retro_debug, retro_warn};

/// Format used when the surface accepts any format
pub const DEFAULT_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::R8G8B8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// The 32-bit encodings the frontend can display
const ACCEPTED_FORMATS: [vk::Format; 2] = [vk::Format::R8G8B8A8_UNORM, vk::Format::B8G8R8A8_UNORM];

/// Pick the surface format
///
/// The "undefined" entry means the surface takes anything, so RGBA8 +
/// sRGB-nonlinear is used. Otherwise the first RGBA8/BGRA8 unorm entry wins,
/// keeping the driver's color space.
///
/// # Errors
///
/// `Error::Configuration` when no accepted encoding is listed.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Result<vk::SurfaceFormatKHR> {
    if formats.iter().any(|f| f.format == vk::Format::UNDEFINED) {
        return Ok(DEFAULT_SURFACE_FORMAT);
    }

    formats
        .iter()
        .copied()
        .find(|f| ACCEPTED_FORMATS.contains(&f.format))
        .ok_or_else(|| {
            retro_critical!(
                "retro::swapchain::selector",
                "Unable to find required swapchain format among {:?}",
                formats.iter().map(|f| f.format).collect::<Vec<_>>()
            );
            Error::Configuration("no R8G8B8A8_UNORM or B8G8R8A8_UNORM surface format".to_string())
        })
}

/// Why the selected present mode is not the one the configuration asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentModeFallback {
    /// Neither Immediate nor Mailbox exists, FIFO is forced
    NoAlternatives,
    /// Uncapped frame limit with vsync wants Mailbox, Immediate is used instead
    MailboxUnavailable,
}

impl fmt::Display for PresentModeFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentModeFallback::NoAlternatives => {
                write!(f, "Forcing Fifo present mode as no alternatives are available")
            }
            PresentModeFallback::MailboxUnavailable => {
                write!(f, "Vsync enabled while frame limiting and no mailbox support, expect tearing")
            }
        }
    }
}

/// Outcome of present-mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentModeSelection {
    /// Chosen mode
    pub mode: vk::PresentModeKHR,
    /// Set when a degraded substitute was chosen
    pub fallback: Option<PresentModeFallback>,
}

/// Pick the present mode
///
/// Priority order:
/// 1. no Immediate and no Mailbox: FIFO (degraded)
/// 2. vsync off: Immediate, else Mailbox
/// 3. vsync on and frame limit above 100%: Mailbox, else Immediate (degraded)
/// 4. FIFO
pub fn choose_present_mode(modes: &[vk::PresentModeKHR], config: &SwapchainConfig) -> PresentModeSelection {
    let has_immediate = modes.contains(&vk::PresentModeKHR::IMMEDIATE);
    let has_mailbox = modes.contains(&vk::PresentModeKHR::MAILBOX);

    if !has_immediate && !has_mailbox {
        return PresentModeSelection {
            mode: vk::PresentModeKHR::FIFO,
            fallback: Some(PresentModeFallback::NoAlternatives),
        };
    }

    // Least latency, may tear
    if !config.use_vsync {
        let mode = if has_immediate {
            vk::PresentModeKHR::IMMEDIATE
        } else {
            vk::PresentModeKHR::MAILBOX
        };
        return PresentModeSelection { mode, fallback: None };
    }

    // Speed-up with vsync: keep compositing only the latest frame
    if config.is_uncapped() {
        return if has_mailbox {
            PresentModeSelection { mode: vk::PresentModeKHR::MAILBOX, fallback: None }
        } else {
            PresentModeSelection {
                mode: vk::PresentModeKHR::IMMEDIATE,
                fallback: Some(PresentModeFallback::MailboxUnavailable),
            }
        };
    }

    PresentModeSelection { mode: vk::PresentModeKHR::FIFO, fallback: None }
}

/// Pick the image extent
///
/// The surface's current extent wins unless it reports the `u32::MAX`
/// sentinel, in which case the request is clamped into [min, max] per axis.
pub fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, width: u32, height: u32) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }

    vk::Extent2D {
        width: width
            .min(capabilities.max_image_extent.width)
            .max(capabilities.min_image_extent.width),
        height: height
            .min(capabilities.max_image_extent.height)
            .max(capabilities.min_image_extent.height),
    }
}

/// Pick the image count: one image in the background beyond the minimum
///
/// A `max_image_count` of zero means unbounded.
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count.saturating_add(1);
    if capabilities.max_image_count > 0 {
        image_count.min(capabilities.max_image_count)
    } else {
        image_count
    }
}

/// Identity when supported, otherwise whatever the surface currently uses
pub fn choose_pre_transform(capabilities: &vk::SurfaceCapabilitiesKHR) -> vk::SurfaceTransformFlagsKHR {
    if capabilities
        .supported_transforms
        .contains(vk::SurfaceTransformFlagsKHR::IDENTITY)
    {
        vk::SurfaceTransformFlagsKHR::IDENTITY
    } else {
        capabilities.current_transform
    }
}

/// Opaque is not supported everywhere; inherit otherwise
pub fn choose_composite_alpha(capabilities: &vk::SurfaceCapabilitiesKHR) -> vk::CompositeAlphaFlagsKHR {
    if capabilities
        .supported_composite_alpha
        .contains(vk::CompositeAlphaFlagsKHR::OPAQUE)
    {
        vk::CompositeAlphaFlagsKHR::OPAQUE
    } else {
        vk::CompositeAlphaFlagsKHR::INHERIT
    }
}

/// How images are shared between the graphics and present queues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSharing {
    /// Exclusive when both families match, concurrent otherwise
    pub mode: vk::SharingMode,
    /// Families that access the images (one entry when exclusive)
    pub queue_families: Vec<u32>,
}

/// Derive the sharing mode from the graphics and present queue families
pub fn choose_queue_sharing(graphics_family: u32, present_family: u32) -> QueueSharing {
    if graphics_family == present_family {
        QueueSharing {
            mode: vk::SharingMode::EXCLUSIVE,
            queue_families: vec![graphics_family],
        }
    } else {
        QueueSharing {
            mode: vk::SharingMode::CONCURRENT,
            queue_families: vec![graphics_family, present_family],
        }
    }
}

/// Negotiated swapchain parameters
#[derive(Debug, Clone)]
pub struct SwapchainParams {
    /// Chosen format + color space
    pub surface_format: vk::SurfaceFormatKHR,
    /// Chosen present mode
    pub present_mode: vk::PresentModeKHR,
    /// Image extent
    pub extent: vk::Extent2D,
    /// Image count the surface would prefer (the frontend's mask decides the pool size)
    pub min_image_count: u32,
    /// Pre-transform
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    /// Composite alpha mode
    pub composite_alpha: vk::CompositeAlphaFlagsKHR,
    /// Queue sharing
    pub sharing: QueueSharing,
}

impl SwapchainParams {
    /// Run every selection step against a probed surface
    ///
    /// Degraded present-mode fallbacks are logged at warning level and
    /// selection continues with the substitute.
    ///
    /// # Errors
    ///
    /// Propagates the fatal format error from [`choose_surface_format`].
    pub fn negotiate(
        support: &SurfaceSupport,
        config: &SwapchainConfig,
        width: u32,
        height: u32,
        graphics_family: u32,
        present_family: u32,
    ) -> Result<Self> {
        let surface_format = choose_surface_format(&support.formats)?;

        let selection = choose_present_mode(&support.present_modes, config);
        if let Some(fallback) = selection.fallback {
            retro_warn!("retro::swapchain::selector", "{}", fallback);
        }

        let params = Self {
            surface_format,
            present_mode: selection.mode,
            extent: choose_extent(&support.capabilities, width, height),
            min_image_count: choose_image_count(&support.capabilities),
            pre_transform: choose_pre_transform(&support.capabilities),
            composite_alpha: choose_composite_alpha(&support.capabilities),
            sharing: choose_queue_sharing(graphics_family, present_family),
        };

        retro_debug!(
            "retro::swapchain::selector",
            "Negotiated {:?}/{:?}, {:?}, {}x{}, {} images",
            params.surface_format.format,
            params.surface_format.color_space,
            params.present_mode,
            params.extent.width,
            params.extent.height,
            params.min_image_count
        );

        Ok(params)
    }
}

#[cfg(test)]
#[path = "format_selector_tests.rs"]
mod tests;
