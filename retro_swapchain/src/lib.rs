/*!
# Retro Swapchain

Core types for presenting a libretro core's Vulkan frames through the
frontend's `retro_hw_render_interface_vulkan`.

The frontend owns the real presentation engine. This crate keeps a fixed ring
of GPU images sized by the frontend's sync-index mask, renders into them and
hands each finished image back through `set_image`.

## Architecture

- **SurfaceSupport**: capability snapshot of a surface
- **SwapchainParams**: format / present mode / extent negotiation policy
- **ImagePool**: the presentable images (memory + views)
- **SyncSet**: per-slot semaphore pairs
- **Swapchain**: acquire / present / recreate lifecycle
- **DisplayedIndex**: the index shared with the frontend's presentation thread

The Vulkan side of the host traits (`SwapchainDevice`, `SurfaceProber`,
`PresentationHost`) lives in the `retro_swapchain_vulkan` crate.
*/

// Internal modules
mod error;
mod runtime;
pub mod log;
pub mod config;
pub mod swapchain;

// Main retro namespace module
pub mod retro {
    // Error types
    pub use crate::error::{Error, Result};

    // Process-wide services (logger)
    pub use crate::runtime::Runtime;

    // User configuration
    pub use crate::config::SwapchainConfig;

    // Logging sub-module (types only, macros are exported at crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Config sub-module with the core-option keys
    pub mod config {
        pub use crate::config::*;
    }

    // Swapchain sub-module
    pub mod swapchain {
        pub use crate::swapchain::*;
    }
}

// Re-export the Vulkan bindings the public API is expressed in
pub use ash;
