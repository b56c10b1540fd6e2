//! Swapchain module - frontend-backed presentation
//!
//! Leaf-first: capability probing, format/mode selection, the image pool, the
//! per-slot semaphores, then the controller composing them.

pub mod swapchain_host;
pub mod capability_prober;
pub mod format_selector;
pub mod image_pool;
pub mod sync_set;
pub mod displayed_index;
pub mod swapchain;

#[cfg(test)]
pub mod mock_device;

pub use swapchain_host::*;
pub use capability_prober::*;
pub use format_selector::*;
pub use image_pool::*;
pub use sync_set::*;
pub use displayed_index::*;
pub use swapchain::*;
