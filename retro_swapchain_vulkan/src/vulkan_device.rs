/// VulkanSwapchainDevice - SwapchainDevice over ash

use ash::prelude::VkResult;
use ash::vk;
use retro_swapchain::retro::swapchain::SwapchainDevice;

/// Device operations on the frontend's logical device
///
/// Does not own the device: the frontend created it and destroys it.
pub struct VulkanSwapchainDevice {
    device: ash::Device,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    graphics_queue_family: u32,
    present_queue_family: u32,
}

impl VulkanSwapchainDevice {
    /// Wrap a loaded device
    ///
    /// # Arguments
    ///
    /// * `instance` - Instance the physical device belongs to
    /// * `physical_device` - Physical device, queried once for memory properties
    /// * `device` - Loaded logical device
    /// * `graphics_queue_family` - Family the core renders on
    /// * `present_queue_family` - Family the frontend presents from
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        graphics_queue_family: u32,
        present_queue_family: u32,
    ) -> Self {
        let memory_properties = unsafe { instance.get_physical_device_memory_properties(physical_device) };

        Self {
            device,
            memory_properties,
            graphics_queue_family,
            present_queue_family,
        }
    }

    /// Underlying ash device
    pub fn raw(&self) -> &ash::Device {
        &self.device
    }
}

impl SwapchainDevice for VulkanSwapchainDevice {
    fn create_image(&self, info: &vk::ImageCreateInfo<'_>) -> VkResult<vk::Image> {
        unsafe { self.device.create_image(info, None) }
    }

    fn destroy_image(&self, image: vk::Image) {
        unsafe { self.device.destroy_image(image, None) }
    }

    fn image_memory_requirements(&self, image: vk::Image) -> vk::MemoryRequirements {
        unsafe { self.device.get_image_memory_requirements(image) }
    }

    fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties {
        self.memory_properties
    }

    fn allocate_memory(&self, info: &vk::MemoryAllocateInfo<'_>) -> VkResult<vk::DeviceMemory> {
        unsafe { self.device.allocate_memory(info, None) }
    }

    fn free_memory(&self, memory: vk::DeviceMemory) {
        unsafe { self.device.free_memory(memory, None) }
    }

    fn bind_image_memory(&self, image: vk::Image, memory: vk::DeviceMemory, offset: vk::DeviceSize) -> VkResult<()> {
        unsafe { self.device.bind_image_memory(image, memory, offset) }
    }

    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        unsafe { self.device.create_image_view(info, None) }
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let info = vk::SemaphoreCreateInfo::default();
        unsafe { self.device.create_semaphore(&info, None) }
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        unsafe { self.device.destroy_semaphore(semaphore, None) }
    }

    fn graphics_queue_family(&self) -> u32 {
        self.graphics_queue_family
    }

    fn present_queue_family(&self) -> u32 {
        self.present_queue_family
    }
}
