/// Host-facing traits - the narrow interfaces the swapchain consumes
///
/// The swapchain never talks to Vulkan or to the frontend directly. It goes
/// through three traits so the policy and lifecycle code can be exercised
/// without a GPU:
///
/// - [`SurfaceProber`]: capability queries on the physical device + surface
/// - [`SwapchainDevice`]: creation and destruction of images, memory, views, semaphores
/// - [`PresentationHost`]: the frontend's sync-index and image-submission callbacks
///
/// The Vulkan crate implements all three on top of ash and the libretro
/// `retro_hw_render_interface_vulkan` table.

use ash::prelude::VkResult;
use ash::vk;
use std::sync::Arc;

/// Presentable image descriptor handed to the frontend
///
/// Layout-compatible with libretro's `struct retro_vulkan_image`, so the
/// Vulkan crate can pass a pointer to it straight through `set_image`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PresentableImage {
    /// View the frontend samples from
    pub image_view: vk::ImageView,
    /// Layout the image is in when the frontend receives it
    pub image_layout: vk::ImageLayout,
    /// The create info `image_view` was built from
    pub create_info: vk::ImageViewCreateInfo<'static>,
}

/// Capability queries for a physical device + surface pair
pub trait SurfaceProber: Send + Sync {
    /// Supported {format, color space} pairs, in driver order
    fn surface_formats(&self, surface: vk::SurfaceKHR) -> VkResult<Vec<vk::SurfaceFormatKHR>>;

    /// Supported present modes
    fn present_modes(&self, surface: vk::SurfaceKHR) -> VkResult<Vec<vk::PresentModeKHR>>;

    /// Surface capabilities (extents, image-count bounds, transforms, composite alpha)
    fn surface_capabilities(&self, surface: vk::SurfaceKHR) -> VkResult<vk::SurfaceCapabilitiesKHR>;
}

/// Device operations needed to build and tear down the image pool
///
/// Destruction functions take handles created by the same device and must be
/// called at most once per handle.
pub trait SwapchainDevice: Send + Sync {
    /// Create an image
    fn create_image(&self, info: &vk::ImageCreateInfo<'_>) -> VkResult<vk::Image>;

    /// Destroy an image
    fn destroy_image(&self, image: vk::Image);

    /// Memory requirements of an image
    fn image_memory_requirements(&self, image: vk::Image) -> vk::MemoryRequirements;

    /// Memory types and heaps of the physical device
    fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties;

    /// Allocate device memory
    fn allocate_memory(&self, info: &vk::MemoryAllocateInfo<'_>) -> VkResult<vk::DeviceMemory>;

    /// Free device memory
    fn free_memory(&self, memory: vk::DeviceMemory);

    /// Bind memory to an image
    fn bind_image_memory(&self, image: vk::Image, memory: vk::DeviceMemory, offset: vk::DeviceSize) -> VkResult<()>;

    /// Create an image view
    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView>;

    /// Destroy an image view
    fn destroy_image_view(&self, view: vk::ImageView);

    /// Create a binary semaphore
    fn create_semaphore(&self) -> VkResult<vk::Semaphore>;

    /// Destroy a semaphore
    fn destroy_semaphore(&self, semaphore: vk::Semaphore);

    /// Queue family used for rendering
    fn graphics_queue_family(&self) -> u32;

    /// Queue family used for presentation
    fn present_queue_family(&self) -> u32;
}

/// The frontend's presentation interface
///
/// The frontend is authoritative on how many images it cycles through
/// (`sync_index_mask`) and on which one is free next (`sync_index`).
pub trait PresentationHost: Send + Sync {
    /// Block until the frontend releases the next sync index
    fn wait_sync_index(&self);

    /// The sync index that is free for rendering
    fn sync_index(&self) -> u32;

    /// Bitmask of every sync index the frontend cycles through
    fn sync_index_mask(&self) -> u32;

    /// Queue family the frontend submits on
    fn queue_index(&self) -> u32;

    /// Hand an image to the frontend for display
    ///
    /// # Arguments
    ///
    /// * `image` - Descriptor of the image to display
    /// * `semaphores` - Semaphores the frontend waits on before reading the image
    /// * `src_queue_family` - Queue family that last wrote the image
    fn set_image(&self, image: &PresentableImage, semaphores: &[vk::Semaphore], src_queue_family: u32);
}

/// Bundle of the three host-facing interfaces
///
/// Shared (via `Arc`) so the frontend glue can keep its own handle to the
/// presentation host while the swapchain owns the rest.
#[derive(Clone)]
pub struct SwapchainContext {
    /// Device used for every object the swapchain creates
    pub device: Arc<dyn SwapchainDevice>,
    /// Surface capability queries
    pub prober: Arc<dyn SurfaceProber>,
    /// Frontend presentation callbacks
    pub host: Arc<dyn PresentationHost>,
}

impl SwapchainContext {
    /// Create a new context
    pub fn new(
        device: Arc<dyn SwapchainDevice>,
        prober: Arc<dyn SurfaceProber>,
        host: Arc<dyn PresentationHost>,
    ) -> Self {
        Self { device, prober, host }
    }
}
