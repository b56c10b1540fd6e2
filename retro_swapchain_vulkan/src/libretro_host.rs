/// LibretroHost - PresentationHost over the frontend's Vulkan callback table

use ash::vk;
use retro_swapchain::retro::swapchain::{PresentableImage, PresentationHost};
use retro_swapchain::retro::{Error, Result};
use retro_swapchain::{retro_critical, retro_debug};
use std::ptr;

use crate::libretro::{
    retro_hw_render_interface_vulkan, RETRO_HW_RENDER_INTERFACE_VULKAN,
    RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION,
};

/// The frontend's presentation interface
///
/// Holds a validated copy of the table returned by
/// `RETRO_ENVIRONMENT_GET_HW_RENDER_INTERFACE`. Every callback the swapchain
/// needs is checked for presence at construction.
pub struct LibretroHost {
    interface: retro_hw_render_interface_vulkan,
}

// The table is immutable after construction and libretro allows its callbacks
// from the core's render thread, which may differ from the thread that built it.
unsafe impl Send for LibretroHost {}
unsafe impl Sync for LibretroHost {}

impl LibretroHost {
    /// Validate and copy the frontend's interface table
    ///
    /// # Safety
    ///
    /// `interface` must be null or point to a table filled in by the
    /// frontend, whose `handle` and callbacks stay valid until the hardware
    /// context is destroyed.
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` for a null table, a wrong interface type
    /// or version, or a missing callback.
    pub unsafe fn from_raw(interface: *const retro_hw_render_interface_vulkan) -> Result<Self> {
        if interface.is_null() {
            retro_critical!("retro::vulkan::host", "Frontend did not provide a Vulkan render interface");
            return Err(Error::InitializationFailed("missing hardware render interface".to_string()));
        }

        let interface = *interface;

        if interface.interface_type != RETRO_HW_RENDER_INTERFACE_VULKAN {
            retro_critical!(
                "retro::vulkan::host",
                "Render interface type {} is not Vulkan",
                interface.interface_type
            );
            return Err(Error::InitializationFailed(format!(
                "interface type {} is not Vulkan",
                interface.interface_type
            )));
        }

        if interface.interface_version != RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION {
            retro_critical!(
                "retro::vulkan::host",
                "Render interface version {} (expected {})",
                interface.interface_version,
                RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION
            );
            return Err(Error::InitializationFailed(format!(
                "interface version {}, expected {}",
                interface.interface_version, RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION
            )));
        }

        let callbacks = [
            ("set_image", interface.set_image.is_some()),
            ("get_sync_index", interface.get_sync_index.is_some()),
            ("get_sync_index_mask", interface.get_sync_index_mask.is_some()),
            ("wait_sync_index", interface.wait_sync_index.is_some()),
        ];
        if let Some((name, _)) = callbacks.iter().find(|(_, present)| !present) {
            retro_critical!("retro::vulkan::host", "Render interface lacks {}", name);
            return Err(Error::InitializationFailed(format!("missing callback {}", name)));
        }

        retro_debug!(
            "retro::vulkan::host",
            "Using frontend render interface v{}, queue family {}",
            interface.interface_version,
            interface.queue_index
        );

        Ok(Self { interface })
    }

    /// Raw copy of the table
    pub fn interface(&self) -> &retro_hw_render_interface_vulkan {
        &self.interface
    }

    /// Frontend's instance
    pub fn instance(&self) -> vk::Instance {
        self.interface.instance
    }

    /// Frontend's physical device
    pub fn gpu(&self) -> vk::PhysicalDevice {
        self.interface.gpu
    }

    /// Frontend's logical device
    pub fn device(&self) -> vk::Device {
        self.interface.device
    }

    /// Frontend's graphics queue
    pub fn queue(&self) -> vk::Queue {
        self.interface.queue
    }
}

impl PresentationHost for LibretroHost {
    fn wait_sync_index(&self) {
        if let Some(wait_sync_index) = self.interface.wait_sync_index {
            unsafe { wait_sync_index(self.interface.handle) }
        }
    }

    fn sync_index(&self) -> u32 {
        match self.interface.get_sync_index {
            Some(get_sync_index) => unsafe { get_sync_index(self.interface.handle) },
            None => 0,
        }
    }

    fn sync_index_mask(&self) -> u32 {
        match self.interface.get_sync_index_mask {
            Some(get_sync_index_mask) => unsafe { get_sync_index_mask(self.interface.handle) },
            None => 0,
        }
    }

    fn queue_index(&self) -> u32 {
        self.interface.queue_index
    }

    fn set_image(&self, image: &PresentableImage, semaphores: &[vk::Semaphore], src_queue_family: u32) {
        let semaphores_ptr = if semaphores.is_empty() {
            ptr::null()
        } else {
            semaphores.as_ptr()
        };

        if let Some(set_image) = self.interface.set_image {
            unsafe {
                set_image(
                    self.interface.handle,
                    image,
                    semaphores.len() as u32,
                    semaphores_ptr,
                    src_queue_family,
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "libretro_host_tests.rs"]
mod tests;
