/// VulkanContext - ash loaders over the frontend's Vulkan objects
///
/// The frontend creates the instance, picks the GPU and creates the device.
/// This context only loads function pointers for them and bundles the three
/// host-facing implementations into a `SwapchainContext`.

use ash::vk::Handle;
use retro_swapchain::retro::swapchain::{PresentationHost, SwapchainContext};
use retro_swapchain::retro::{Error, Result};
use retro_swapchain::{retro_critical, retro_info};
use std::sync::Arc;

use crate::libretro::retro_hw_render_interface_vulkan;
use crate::libretro_host::LibretroHost;
use crate::vulkan_device::VulkanSwapchainDevice;
use crate::vulkan_surface::VulkanSurfaceProber;

/// Loaded Vulkan state for the frontend's device
pub struct VulkanContext {
    /// Kept alive for the lifetime of the loaded function pointers
    #[allow(dead_code)]
    entry: ash::Entry,
    instance: ash::Instance,
    device: Arc<VulkanSwapchainDevice>,
    prober: Arc<VulkanSurfaceProber>,
    host: Arc<LibretroHost>,
}

impl VulkanContext {
    /// Load everything from the frontend's interface table
    ///
    /// # Safety
    ///
    /// Same contract as [`LibretroHost::from_raw`]; additionally the
    /// table's instance, GPU and device must be live.
    pub unsafe fn from_interface(interface: *const retro_hw_render_interface_vulkan) -> Result<Self> {
        let host = LibretroHost::from_raw(interface)?;
        Self::from_host(host)
    }

    /// Load everything from an already validated host
    ///
    /// Uses the frontend's `vkGetInstanceProcAddr` when it provides one, the
    /// system Vulkan loader otherwise.
    ///
    /// # Safety
    ///
    /// The host's instance, GPU and device must be live.
    pub unsafe fn from_host(host: LibretroHost) -> Result<Self> {
        if host.instance().is_null() || host.device().is_null() {
            retro_critical!("retro::vulkan::context", "Frontend interface has no instance or device");
            return Err(Error::InitializationFailed("null instance or device".to_string()));
        }

        let entry = match host.interface().get_instance_proc_addr {
            Some(get_instance_proc_addr) => ash::Entry::from_static_fn(ash::StaticFn { get_instance_proc_addr }),
            None => ash::Entry::load().map_err(|e| {
                retro_critical!("retro::vulkan::context", "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan: {:?}", e))
            })?,
        };

        let instance = ash::Instance::load(entry.static_fn(), host.instance());
        let device = ash::Device::load(instance.fp_v1_0(), host.device());
        let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

        let queue_family = host.queue_index();
        let device = VulkanSwapchainDevice::new(&instance, host.gpu(), device, queue_family, queue_family);
        let prober = VulkanSurfaceProber::new(surface_loader, host.gpu());

        retro_info!(
            "retro::vulkan::context",
            "Vulkan context loaded from frontend (queue family {}, sync mask {:#x})",
            queue_family,
            host.sync_index_mask()
        );

        Ok(Self {
            entry,
            instance,
            device: Arc::new(device),
            prober: Arc::new(prober),
            host: Arc::new(host),
        })
    }

    /// Bundle for `Swapchain::new`
    pub fn swapchain_context(&self) -> SwapchainContext {
        SwapchainContext::new(self.device.clone(), self.prober.clone(), self.host.clone())
    }

    /// Loaded instance
    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    /// Device wrapper
    pub fn device(&self) -> &Arc<VulkanSwapchainDevice> {
        &self.device
    }

    /// Surface prober
    pub fn prober(&self) -> &Arc<VulkanSurfaceProber> {
        &self.prober
    }

    /// Frontend host
    pub fn host(&self) -> &Arc<LibretroHost> {
        &self.host
    }
}
