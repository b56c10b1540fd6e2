/// VulkanSurfaceProber - SurfaceProber over VK_KHR_surface

use ash::prelude::VkResult;
use ash::vk;
use retro_swapchain::retro::swapchain::SurfaceProber;

/// Surface queries for one physical device
pub struct VulkanSurfaceProber {
    surface_loader: ash::khr::surface::Instance,
    physical_device: vk::PhysicalDevice,
}

impl VulkanSurfaceProber {
    /// Create a prober for `physical_device`
    pub fn new(surface_loader: ash::khr::surface::Instance, physical_device: vk::PhysicalDevice) -> Self {
        Self {
            surface_loader,
            physical_device,
        }
    }

    /// Whether `queue_family` can present to `surface`
    pub fn supports_present(&self, queue_family: u32, surface: vk::SurfaceKHR) -> VkResult<bool> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_support(self.physical_device, queue_family, surface)
        }
    }
}

impl SurfaceProber for VulkanSurfaceProber {
    fn surface_formats(&self, surface: vk::SurfaceKHR) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_formats(self.physical_device, surface)
        }
    }

    fn present_modes(&self, surface: vk::SurfaceKHR) -> VkResult<Vec<vk::PresentModeKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_present_modes(self.physical_device, surface)
        }
    }

    fn surface_capabilities(&self, surface: vk::SurfaceKHR) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_capabilities(self.physical_device, surface)
        }
    }
}
