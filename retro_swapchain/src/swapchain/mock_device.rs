/// Mock device, prober and frontend host for unit tests (no GPU required)
///
/// Handles are unique monotonically increasing integers so tests can tell
/// live objects from destroyed ones and catch stale references.

use ash::prelude::VkResult;
use ash::vk;
use ash::vk::Handle;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::swapchain::{
    PresentableImage, PresentationHost, SurfaceProber, SwapchainContext, SwapchainDevice,
};

/// Surface handle accepted by [`MockProber`]
pub fn mock_surface() -> vk::SurfaceKHR {
    vk::SurfaceKHR::from_raw(0xD15B_1A7)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Mock Device
// ============================================================================

/// Device calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    CreateImage,
    AllocateMemory,
    BindMemory,
    CreateImageView,
    CreateSemaphore,
}

/// What an image was created with
#[derive(Debug, Clone, Copy)]
pub struct ImageSummary {
    pub handle: u64,
    pub flags: vk::ImageCreateFlags,
    pub image_type: vk::ImageType,
    pub format: vk::Format,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub samples: vk::SampleCountFlags,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub initial_layout: vk::ImageLayout,
}

/// What a view was created with
#[derive(Debug, Clone, Copy)]
pub struct ViewSummary {
    pub handle: u64,
    pub image: u64,
    pub view_type: vk::ImageViewType,
    pub format: vk::Format,
    pub aspect_mask: vk::ImageAspectFlags,
    pub level_count: u32,
    pub layer_count: u32,
    pub identity_swizzle: bool,
}

#[derive(Default)]
struct MockDeviceState {
    next_handle: u64,
    images: FxHashSet<u64>,
    memories: FxHashSet<u64>,
    views: FxHashSet<u64>,
    semaphores: FxHashSet<u64>,
    image_sizes: FxHashMap<u64, u64>,
    created_images: Vec<ImageSummary>,
    created_views: Vec<ViewSummary>,
    allocations: Vec<(u64, u32)>,
    bindings: Vec<(u64, u64, u64)>,
    destroyed: Vec<u64>,
    calls: FxHashMap<MockCall, usize>,
    failures: FxHashMap<MockCall, (usize, vk::Result)>,
}

impl MockDeviceState {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Count the call and fail it if it was scheduled to
    fn check(&mut self, call: MockCall) -> VkResult<()> {
        let count = self.calls.entry(call).or_insert(0);
        let nth = *count;
        *count += 1;
        match self.failures.get(&call) {
            Some(&(fail_at, result)) if fail_at == nth => Err(result),
            _ => Ok(()),
        }
    }

    fn release(set: &mut FxHashSet<u64>, destroyed: &mut Vec<u64>, raw: u64, what: &str) {
        assert!(set.remove(&raw), "{} {:#x} destroyed twice or never created", what, raw);
        destroyed.push(raw);
    }
}

/// In-memory [`SwapchainDevice`]
pub struct MockDevice {
    state: Mutex<MockDeviceState>,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    memory_type_bits: u32,
    graphics_family: u32,
    present_family: u32,
}

impl MockDevice {
    /// Two memory types: 0 host-visible, 1 device-local; images accept both
    pub fn new() -> Self {
        let mut memory_properties = vk::PhysicalDeviceMemoryProperties::default();
        memory_properties.memory_type_count = 2;
        memory_properties.memory_types[0].property_flags =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        memory_properties.memory_types[1].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
        memory_properties.memory_heap_count = 1;

        Self {
            state: Mutex::new(MockDeviceState::default()),
            memory_properties,
            memory_type_bits: 0b11,
            graphics_family: 0,
            present_family: 0,
        }
    }

    pub fn with_memory_properties(mut self, properties: vk::PhysicalDeviceMemoryProperties) -> Self {
        self.memory_properties = properties;
        self
    }

    pub fn with_memory_type_bits(mut self, bits: u32) -> Self {
        self.memory_type_bits = bits;
        self
    }

    pub fn with_queue_families(mut self, graphics: u32, present: u32) -> Self {
        self.graphics_family = graphics;
        self.present_family = present;
        self
    }

    /// Fail the `nth` call of kind `call` (0-based, counted since the device was created)
    pub fn fail_on(&self, call: MockCall, nth: usize, result: vk::Result) {
        lock(&self.state).failures.insert(call, (nth, result));
    }

    pub fn clear_failures(&self) {
        lock(&self.state).failures.clear();
    }

    pub fn call_count(&self, call: MockCall) -> usize {
        lock(&self.state).calls.get(&call).copied().unwrap_or(0)
    }

    pub fn live_images(&self) -> usize {
        lock(&self.state).images.len()
    }

    pub fn live_memories(&self) -> usize {
        lock(&self.state).memories.len()
    }

    pub fn live_views(&self) -> usize {
        lock(&self.state).views.len()
    }

    pub fn live_semaphores(&self) -> usize {
        lock(&self.state).semaphores.len()
    }

    /// Live objects of every kind
    pub fn live_objects(&self) -> usize {
        let state = lock(&self.state);
        state.images.len() + state.memories.len() + state.views.len() + state.semaphores.len()
    }

    /// Whether `raw` names an object that exists right now
    pub fn is_live(&self, raw: u64) -> bool {
        let state = lock(&self.state);
        state.images.contains(&raw)
            || state.memories.contains(&raw)
            || state.views.contains(&raw)
            || state.semaphores.contains(&raw)
    }

    pub fn was_destroyed(&self, raw: u64) -> bool {
        lock(&self.state).destroyed.contains(&raw)
    }

    pub fn created_images(&self) -> Vec<ImageSummary> {
        lock(&self.state).created_images.clone()
    }

    pub fn created_views(&self) -> Vec<ViewSummary> {
        lock(&self.state).created_views.clone()
    }

    /// `(size, memory type index)` of every allocation
    pub fn allocations(&self) -> Vec<(u64, u32)> {
        lock(&self.state).allocations.clone()
    }

    /// `(image, memory, offset)` of every bind
    pub fn bindings(&self) -> Vec<(u64, u64, u64)> {
        lock(&self.state).bindings.clone()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapchainDevice for MockDevice {
    fn create_image(&self, info: &vk::ImageCreateInfo<'_>) -> VkResult<vk::Image> {
        let mut state = lock(&self.state);
        state.check(MockCall::CreateImage)?;
        let raw = state.next();
        state.images.insert(raw);
        state
            .image_sizes
            .insert(raw, info.extent.width as u64 * info.extent.height as u64 * 4);
        state.created_images.push(ImageSummary {
            handle: raw,
            flags: info.flags,
            image_type: info.image_type,
            format: info.format,
            width: info.extent.width,
            height: info.extent.height,
            depth: info.extent.depth,
            mip_levels: info.mip_levels,
            array_layers: info.array_layers,
            samples: info.samples,
            tiling: info.tiling,
            usage: info.usage,
            initial_layout: info.initial_layout,
        });
        Ok(vk::Image::from_raw(raw))
    }

    fn destroy_image(&self, image: vk::Image) {
        let state = &mut *lock(&self.state);
        MockDeviceState::release(&mut state.images, &mut state.destroyed, image.as_raw(), "image");
    }

    fn image_memory_requirements(&self, image: vk::Image) -> vk::MemoryRequirements {
        let state = lock(&self.state);
        vk::MemoryRequirements {
            size: state.image_sizes.get(&image.as_raw()).copied().unwrap_or(0),
            alignment: 256,
            memory_type_bits: self.memory_type_bits,
        }
    }

    fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties {
        self.memory_properties
    }

    fn allocate_memory(&self, info: &vk::MemoryAllocateInfo<'_>) -> VkResult<vk::DeviceMemory> {
        let mut state = lock(&self.state);
        state.check(MockCall::AllocateMemory)?;
        let raw = state.next();
        state.memories.insert(raw);
        state.allocations.push((info.allocation_size, info.memory_type_index));
        Ok(vk::DeviceMemory::from_raw(raw))
    }

    fn free_memory(&self, memory: vk::DeviceMemory) {
        let state = &mut *lock(&self.state);
        MockDeviceState::release(&mut state.memories, &mut state.destroyed, memory.as_raw(), "memory");
    }

    fn bind_image_memory(&self, image: vk::Image, memory: vk::DeviceMemory, offset: vk::DeviceSize) -> VkResult<()> {
        let mut state = lock(&self.state);
        state.check(MockCall::BindMemory)?;
        assert!(state.images.contains(&image.as_raw()), "bind to dead image");
        assert!(state.memories.contains(&memory.as_raw()), "bind of dead memory");
        state.bindings.push((image.as_raw(), memory.as_raw(), offset));
        Ok(())
    }

    fn create_image_view(&self, info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        let mut state = lock(&self.state);
        state.check(MockCall::CreateImageView)?;
        assert!(state.images.contains(&info.image.as_raw()), "view of dead image");
        let raw = state.next();
        state.views.insert(raw);
        let c = info.components;
        state.created_views.push(ViewSummary {
            handle: raw,
            image: info.image.as_raw(),
            view_type: info.view_type,
            format: info.format,
            aspect_mask: info.subresource_range.aspect_mask,
            level_count: info.subresource_range.level_count,
            layer_count: info.subresource_range.layer_count,
            identity_swizzle: [c.r, c.g, c.b, c.a]
                .iter()
                .all(|&s| s == vk::ComponentSwizzle::IDENTITY),
        });
        Ok(vk::ImageView::from_raw(raw))
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        let state = &mut *lock(&self.state);
        MockDeviceState::release(&mut state.views, &mut state.destroyed, view.as_raw(), "view");
    }

    fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let mut state = lock(&self.state);
        state.check(MockCall::CreateSemaphore)?;
        let raw = state.next();
        state.semaphores.insert(raw);
        Ok(vk::Semaphore::from_raw(raw))
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        let state = &mut *lock(&self.state);
        MockDeviceState::release(&mut state.semaphores, &mut state.destroyed, semaphore.as_raw(), "semaphore");
    }

    fn graphics_queue_family(&self) -> u32 {
        self.graphics_family
    }

    fn present_queue_family(&self) -> u32 {
        self.present_family
    }
}

// ============================================================================
// Mock Prober
// ============================================================================

struct MockProberState {
    formats: Vec<vk::SurfaceFormatKHR>,
    present_modes: Vec<vk::PresentModeKHR>,
    capabilities: vk::SurfaceCapabilitiesKHR,
    failure: Option<vk::Result>,
}

/// Scripted [`SurfaceProber`]
pub struct MockProber {
    state: Mutex<MockProberState>,
}

/// 640x480 surface, 2..3 images, identity transform, opaque alpha
pub fn mock_capabilities() -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: 2,
        max_image_count: 3,
        current_extent: vk::Extent2D { width: 640, height: 480 },
        min_image_extent: vk::Extent2D { width: 1, height: 1 },
        max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
        max_image_array_layers: 1,
        supported_transforms: vk::SurfaceTransformFlagsKHR::IDENTITY,
        current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
        supported_composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
        supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT,
    }
}

impl MockProber {
    /// BGRA8 unorm / sRGB nonlinear, every present mode
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockProberState {
                formats: vec![vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_UNORM,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                }],
                present_modes: vec![
                    vk::PresentModeKHR::FIFO,
                    vk::PresentModeKHR::MAILBOX,
                    vk::PresentModeKHR::IMMEDIATE,
                ],
                capabilities: mock_capabilities(),
                failure: None,
            }),
        }
    }

    pub fn set_formats(&self, formats: Vec<vk::SurfaceFormatKHR>) {
        lock(&self.state).formats = formats;
    }

    pub fn set_present_modes(&self, modes: Vec<vk::PresentModeKHR>) {
        lock(&self.state).present_modes = modes;
    }

    pub fn set_capabilities(&self, capabilities: vk::SurfaceCapabilitiesKHR) {
        lock(&self.state).capabilities = capabilities;
    }

    /// Make every query fail with `result`
    pub fn set_failure(&self, result: Option<vk::Result>) {
        lock(&self.state).failure = result;
    }
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceProber for MockProber {
    fn surface_formats(&self, _surface: vk::SurfaceKHR) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        let state = lock(&self.state);
        match state.failure {
            Some(result) => Err(result),
            None => Ok(state.formats.clone()),
        }
    }

    fn present_modes(&self, _surface: vk::SurfaceKHR) -> VkResult<Vec<vk::PresentModeKHR>> {
        let state = lock(&self.state);
        match state.failure {
            Some(result) => Err(result),
            None => Ok(state.present_modes.clone()),
        }
    }

    fn surface_capabilities(&self, _surface: vk::SurfaceKHR) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        let state = lock(&self.state);
        match state.failure {
            Some(result) => Err(result),
            None => Ok(state.capabilities),
        }
    }
}

// ============================================================================
// Mock Host
// ============================================================================

/// One `set_image` call, reduced to plain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentRecord {
    /// Address of the descriptor the host was handed
    pub descriptor: usize,
    pub image_view: u64,
    pub image: u64,
    pub image_layout: vk::ImageLayout,
    pub format: vk::Format,
    pub semaphores: Vec<u64>,
    pub src_queue_family: u32,
}

struct MockHostState {
    mask: u32,
    scripted: VecDeque<u32>,
    next_index: u32,
    waits: usize,
    presents: Vec<PresentRecord>,
}

/// Frontend stand-in cycling through the indices of its mask
pub struct MockHost {
    state: Mutex<MockHostState>,
    queue_index: u32,
}

impl MockHost {
    /// Host cycling through `mask.count_ones()` indices
    pub fn new(mask: u32) -> Self {
        Self {
            state: Mutex::new(MockHostState {
                mask,
                scripted: VecDeque::new(),
                next_index: 0,
                waits: 0,
                presents: Vec::new(),
            }),
            queue_index: 0,
        }
    }

    pub fn with_queue_index(mut self, queue_index: u32) -> Self {
        self.queue_index = queue_index;
        self
    }

    pub fn set_mask(&self, mask: u32) {
        lock(&self.state).mask = mask;
    }

    /// Indices returned by the next `sync_index` calls, before cycling resumes
    pub fn script_indices(&self, indices: &[u32]) {
        lock(&self.state).scripted.extend(indices.iter().copied());
    }

    pub fn wait_count(&self) -> usize {
        lock(&self.state).waits
    }

    pub fn presents(&self) -> Vec<PresentRecord> {
        lock(&self.state).presents.clone()
    }
}

impl PresentationHost for MockHost {
    fn wait_sync_index(&self) {
        lock(&self.state).waits += 1;
    }

    fn sync_index(&self) -> u32 {
        let mut state = lock(&self.state);
        if let Some(index) = state.scripted.pop_front() {
            return index;
        }
        let count = state.mask.count_ones().max(1);
        let index = state.next_index % count;
        state.next_index = (index + 1) % count;
        index
    }

    fn sync_index_mask(&self) -> u32 {
        lock(&self.state).mask
    }

    fn queue_index(&self) -> u32 {
        self.queue_index
    }

    fn set_image(&self, image: &PresentableImage, semaphores: &[vk::Semaphore], src_queue_family: u32) {
        lock(&self.state).presents.push(PresentRecord {
            descriptor: image as *const PresentableImage as usize,
            image_view: image.image_view.as_raw(),
            image: image.create_info.image.as_raw(),
            image_layout: image.image_layout,
            format: image.create_info.format,
            semaphores: semaphores.iter().map(|s| s.as_raw()).collect(),
            src_queue_family,
        });
    }
}

// ============================================================================
// Context helper
// ============================================================================

/// Everything a swapchain test needs, with handles kept for inspection
pub struct MockSetup {
    pub device: Arc<MockDevice>,
    pub prober: Arc<MockProber>,
    pub host: Arc<MockHost>,
}

impl MockSetup {
    /// Default device and prober, host with a 3-image mask
    pub fn new() -> Self {
        Self::with_host(MockHost::new(0b111))
    }

    pub fn with_host(host: MockHost) -> Self {
        Self::from_parts(MockDevice::new(), MockProber::new(), host)
    }

    pub fn from_parts(device: MockDevice, prober: MockProber, host: MockHost) -> Self {
        Self {
            device: Arc::new(device),
            prober: Arc::new(prober),
            host: Arc::new(host),
        }
    }

    pub fn context(&self) -> SwapchainContext {
        SwapchainContext::new(self.device.clone(), self.prober.clone(), self.host.clone())
    }
}

impl Default for MockSetup {
    fn default() -> Self {
        Self::new()
    }
}
