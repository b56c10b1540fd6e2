/*!
# Retro Swapchain - Vulkan Backend

Vulkan implementation of the `retro_swapchain` host traits.

This crate wraps the libretro frontend's `retro_hw_render_interface_vulkan`
callback table and the frontend-owned instance/device (loaded through ash)
so a core can drive `retro_swapchain::retro::swapchain::Swapchain` against a
real GPU.

## Example

```no_run
use retro_swapchain::retro::swapchain::Swapchain;
use retro_swapchain::retro::SwapchainConfig;
use retro_swapchain_vulkan::{VulkanContext, retro_hw_render_interface_vulkan};
# fn run(interface: *const retro_hw_render_interface_vulkan, surface: ash::vk::SurfaceKHR)
#     -> retro_swapchain::retro::Result<()> {
let context = unsafe { VulkanContext::from_interface(interface)? };
let mut swapchain = Swapchain::with_surface(
    context.swapchain_context(),
    SwapchainConfig::default(),
    400,
    480,
    surface,
)?;

let index = swapchain.acquire_next_image()?;
// ... render into swapchain.images()[index as usize] ...
swapchain.present()?;
# Ok(())
# }
```
*/

// Vulkan implementation modules
mod libretro;
mod libretro_host;
mod libretro_logger;
mod vulkan_context;
mod vulkan_device;
mod vulkan_surface;

pub use libretro::{
    retro_hw_render_interface_vulkan, retro_log_level, retro_log_printf_t, retro_vulkan_image,
    RETRO_HW_RENDER_INTERFACE_VULKAN, RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION,
};
pub use libretro_host::LibretroHost;
pub use libretro_logger::{format_entry, log_level, FrontendLogger};
pub use vulkan_context::VulkanContext;
pub use vulkan_device::VulkanSwapchainDevice;
pub use vulkan_surface::VulkanSurfaceProber;
