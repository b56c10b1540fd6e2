/// Swapchain - frontend-backed image ring
///
/// There is no `VkSwapchainKHR` here: the libretro frontend owns the real
/// presentation engine. The swapchain renders into its own pool of images and
/// hands each finished image to the frontend through `set_image`, while the
/// frontend's sync index decides which slot is free next.

use ash::vk;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::SwapchainConfig;
use crate::error::{Error, Result};
use crate::swapchain::{
    slot_count_from_mask, DisplayedIndex, ImagePool, SurfaceSupport, SwapchainContext,
    SwapchainParams, SyncSet,
};
use crate::{retro_critical, retro_debug, retro_info, retro_trace};

/// Lifecycle of a [`Swapchain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapchainState {
    /// Constructed, `create` never succeeded
    Uninitialized,
    /// Resources exist, nothing acquired yet
    Created,
    /// An image is being rendered to
    Acquired,
    /// The last acquired image was handed to the frontend
    Presented,
    /// Resources released (explicitly or after a failed `create`)
    Destroyed,
}

/// Thread-safe "recreate at the next opportunity" flag
///
/// Set from a resize notification, consumed by the next `create`.
#[derive(Debug, Clone, Default)]
pub struct RecreationFlag(Arc<AtomicBool>);

impl RecreationFlag {
    /// Ask for a recreation
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a recreation was requested and not consumed yet
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Consume the request, returning whether one was pending
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Swapchain controller
///
/// `create`, `acquire_next_image`, `present` and `destroy` all take `&mut self`:
/// the renderer thread serializes them. Only the [`DisplayedIndex`] is shared
/// with the frontend's thread.
pub struct Swapchain {
    context: SwapchainContext,
    config: SwapchainConfig,

    /// Target surface and requested size of the last `create`
    surface: vk::SurfaceKHR,
    width: u32,
    height: u32,

    params: Option<SwapchainParams>,
    pool: ImagePool,
    sync: SyncSet,

    /// Sync index of the image being rendered, `None` until the first acquire
    image_index: Option<u32>,
    /// Frame counter, modulo the image count
    frame_index: usize,

    recreation: RecreationFlag,
    displayed: DisplayedIndex,
    state: SwapchainState,
}

impl Swapchain {
    /// Create an uninitialized swapchain; call [`create`](Self::create) before use
    pub fn new(context: SwapchainContext, config: SwapchainConfig) -> Self {
        Self {
            context,
            config,
            surface: vk::SurfaceKHR::null(),
            width: 0,
            height: 0,
            params: None,
            pool: ImagePool::empty(),
            sync: SyncSet::empty(),
            image_index: None,
            frame_index: 0,
            recreation: RecreationFlag::default(),
            displayed: DisplayedIndex::new(),
            state: SwapchainState::Uninitialized,
        }
    }

    /// Construct and immediately [`create`](Self::create)
    pub fn with_surface(
        context: SwapchainContext,
        config: SwapchainConfig,
        width: u32,
        height: u32,
        surface: vk::SurfaceKHR,
    ) -> Result<Self> {
        let mut swapchain = Self::new(context, config);
        swapchain.create(width, height, surface)?;
        Ok(swapchain)
    }

    /// Replace the configuration; applied by the next `create`
    pub fn set_config(&mut self, config: SwapchainConfig) {
        self.config = config;
    }

    /// Current configuration
    pub fn config(&self) -> &SwapchainConfig {
        &self.config
    }

    /// Build (or rebuild) every resource
    ///
    /// Existing resources are always destroyed first; the displayed index
    /// resets and a pending recreation request is consumed. On failure
    /// nothing is left allocated and the state is `Destroyed`.
    ///
    /// # Arguments
    ///
    /// * `width` - Requested width, used when the surface has no fixed extent
    /// * `height` - Requested height, used when the surface has no fixed extent
    /// * `surface` - Surface the frontend presents to
    pub fn create(&mut self, width: u32, height: u32, surface: vk::SurfaceKHR) -> Result<()> {
        if self.recreation.take() {
            retro_debug!("retro::swapchain", "Recreating swapchain on request");
        }

        self.destroy();
        self.state = SwapchainState::Destroyed;
        self.displayed.reset();

        self.surface = surface;
        self.width = width;
        self.height = height;

        let support = SurfaceSupport::query(self.context.prober.as_ref(), surface)?;
        let params = SwapchainParams::negotiate(
            &support,
            &self.config,
            width,
            height,
            self.context.device.graphics_queue_family(),
            self.context.device.present_queue_family(),
        )?;

        let slot_count = slot_count_from_mask(self.context.host.sync_index_mask())?;

        let device = self.context.device.as_ref();
        let mut pool = ImagePool::allocate(device, params.surface_format.format, params.extent, slot_count)?;

        let sync = match SyncSet::create(device, slot_count) {
            Ok(sync) => sync,
            Err(e) => {
                pool.destroy(device);
                return Err(e);
            }
        };

        retro_info!(
            "retro::swapchain",
            "Swapchain ready: {} images, {}x{}, {:?}, {:?}",
            slot_count,
            params.extent.width,
            params.extent.height,
            params.surface_format.format,
            params.present_mode
        );

        self.pool = pool;
        self.sync = sync;
        self.params = Some(params);
        self.image_index = None;
        self.frame_index = 0;
        self.state = SwapchainState::Created;

        Ok(())
    }

    /// Rebuild against the last surface with a new size
    pub fn recreate(&mut self, width: u32, height: u32) -> Result<()> {
        let surface = self.surface;
        self.create(width, height, surface)
    }

    /// Wait for the frontend to free a sync index and make it the active image
    ///
    /// Blocks without timeout; the frontend's pacing bounds the wait.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` before a successful `create`, or when the
    /// frontend reports an index outside the pool.
    pub fn acquire_next_image(&mut self) -> Result<u32> {
        if self.pool.is_empty() {
            retro_critical!("retro::swapchain", "Image acquired without a created swapchain");
            return Err(Error::InvalidState("acquire before create".to_string()));
        }

        // A failed acquire must not leave the previous image presentable
        self.image_index = None;

        let host = self.context.host.as_ref();
        host.wait_sync_index();
        let index = host.sync_index();

        if index as usize >= self.pool.len() {
            retro_critical!(
                "retro::swapchain",
                "Frontend returned sync index {} but only {} images exist",
                index,
                self.pool.len()
            );
            return Err(Error::InvalidState(format!(
                "sync index {} out of range (0..{})",
                index,
                self.pool.len()
            )));
        }

        retro_trace!("retro::swapchain", "Acquired image {}", index);

        self.image_index = Some(index);
        self.state = SwapchainState::Acquired;
        Ok(index)
    }

    /// Hand the active image to the frontend without wait semaphores
    pub fn present(&mut self) -> Result<()> {
        self.present_waiting(&[])
    }

    /// Hand the active image to the frontend
    ///
    /// Publishes the image under the displayed-index lock, wakes waiters and
    /// advances the frame counter. Never waits for the GPU.
    ///
    /// # Arguments
    ///
    /// * `wait_semaphores` - Semaphores the frontend waits on before reading the image
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` when no image was acquired since the last `create`,
    /// or the last acquire failed.
    pub fn present_waiting(&mut self, wait_semaphores: &[vk::Semaphore]) -> Result<()> {
        let index = match self.image_index {
            Some(index) => index,
            None => {
                retro_critical!("retro::swapchain", "Present called before any image was acquired");
                return Err(Error::InvalidState("present before acquire".to_string()));
            }
        };

        let slot = match self.pool.slot(index as usize) {
            Some(slot) => slot,
            None => {
                retro_critical!("retro::swapchain", "Active image {} no longer exists", index);
                return Err(Error::InvalidState(format!("image {} not allocated", index)));
            }
        };

        // The frontend reads the descriptor after `set_image` returns: hand it
        // the pool-owned copy, never a temporary.
        let host = self.context.host.as_ref();
        let presentable = &slot.presentable;
        self.displayed.publish_with(index, || {
            host.set_image(presentable, wait_semaphores, host.queue_index());
        });

        self.frame_index = (self.frame_index + 1) % self.pool.len();
        self.state = SwapchainState::Presented;
        Ok(())
    }

    /// Release every image, allocation, view and semaphore
    ///
    /// Idempotent. Safe at shutdown without a following `create`.
    pub fn destroy(&mut self) {
        if self.pool.is_empty() && self.sync.is_empty() {
            if self.state != SwapchainState::Uninitialized {
                self.state = SwapchainState::Destroyed;
            }
            return;
        }

        let device = self.context.device.as_ref();
        self.sync.destroy(device);
        self.pool.destroy(device);
        self.params = None;
        self.image_index = None;
        self.frame_index = 0;
        self.state = SwapchainState::Destroyed;

        retro_debug!("retro::swapchain", "Swapchain resources destroyed");
    }

    /// Ask for a recreation at the next `create`
    pub fn request_recreation(&self) {
        self.recreation.request();
    }

    /// Whether a recreation request is pending
    pub fn needs_recreation(&self) -> bool {
        self.recreation.is_requested()
    }

    /// Shared handle on the recreation flag (for resize callbacks)
    pub fn recreation_flag(&self) -> RecreationFlag {
        self.recreation.clone()
    }

    /// Shared handle on the displayed index (for frontend-side waiters)
    pub fn displayed_index(&self) -> DisplayedIndex {
        self.displayed.clone()
    }

    /// Negotiated extent (zero before `create`)
    pub fn extent(&self) -> vk::Extent2D {
        self.pool.extent()
    }

    /// Negotiated surface format
    pub fn surface_format(&self) -> Option<vk::SurfaceFormatKHR> {
        self.params.as_ref().map(|params| params.surface_format)
    }

    /// Negotiated present mode
    pub fn present_mode(&self) -> Option<vk::PresentModeKHR> {
        self.params.as_ref().map(|params| params.present_mode)
    }

    /// Full negotiated parameters
    pub fn params(&self) -> Option<&SwapchainParams> {
        self.params.as_ref()
    }

    /// Number of images in the ring
    pub fn image_count(&self) -> usize {
        self.pool.len()
    }

    /// Image count the surface would prefer
    pub fn min_image_count(&self) -> Option<u32> {
        self.params.as_ref().map(|params| params.min_image_count)
    }

    /// Image handles, indexed by sync index
    pub fn images(&self) -> Vec<vk::Image> {
        self.pool.images()
    }

    /// View handles, indexed by sync index
    pub fn image_views(&self) -> Vec<vk::ImageView> {
        self.pool.image_views()
    }

    /// Frame counter
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Active image, if one was acquired
    pub fn image_index(&self) -> Option<u32> {
        self.image_index
    }

    /// Acquire semaphore of the current frame
    pub fn image_acquired_semaphore(&self) -> Option<vk::Semaphore> {
        self.sync.pair(self.frame_index).map(|pair| pair.image_acquired)
    }

    /// Present semaphore of the active image
    pub fn present_ready_semaphore(&self) -> Option<vk::Semaphore> {
        self.image_index
            .and_then(|index| self.sync.pair(index as usize))
            .map(|pair| pair.present_ready)
    }

    /// Lifecycle state
    pub fn state(&self) -> SwapchainState {
        self.state
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "swapchain_tests.rs"]
mod tests;
