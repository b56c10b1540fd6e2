/// Image pool - the fixed ring of presentable images shared with the frontend
///
/// Each slot owns an image, its device-local memory and one 2D view, plus the
/// descriptor the frontend receives in `set_image`. The pool is sized by the
/// frontend's sync-index mask, never by the surface's preferred image count,
/// and it is always destroyed as a whole before a new one is built.

use ash::vk;

use crate::error::{Error, Result};
use crate::swapchain::{PresentableImage, SwapchainDevice};
use crate::{retro_critical, retro_debug, retro_error, retro_info};

/// Hard ceiling on the number of images the frontend may cycle through
pub const MAX_SWAPCHAIN_IMAGES: usize = 8;

/// Layout the frontend expects to receive images in
pub const PRESENT_LAYOUT: vk::ImageLayout = vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL;

/// Usage of every pool image: render target, copy source/destination, and
/// sampled by the frontend
pub const IMAGE_USAGE: vk::ImageUsageFlags = vk::ImageUsageFlags::from_raw(
    vk::ImageUsageFlags::SAMPLED.as_raw()
        | vk::ImageUsageFlags::TRANSFER_SRC.as_raw()
        | vk::ImageUsageFlags::TRANSFER_DST.as_raw()
        | vk::ImageUsageFlags::COLOR_ATTACHMENT.as_raw(),
);

/// Number of slots described by the frontend's sync-index mask
///
/// # Errors
///
/// `Error::Configuration` when the mask is empty or has more bits set than
/// [`MAX_SWAPCHAIN_IMAGES`]. Checked before anything is allocated.
pub fn slot_count_from_mask(mask: u32) -> Result<usize> {
    let count = mask.count_ones() as usize;

    if count == 0 {
        retro_critical!("retro::swapchain::pool", "Frontend reports an empty sync index mask");
        return Err(Error::Configuration("empty sync index mask".to_string()));
    }

    if count > MAX_SWAPCHAIN_IMAGES {
        retro_critical!(
            "retro::swapchain::pool",
            "Frontend cycles through {} images (mask {:#010x}), at most {} are supported",
            count,
            mask,
            MAX_SWAPCHAIN_IMAGES
        );
        return Err(Error::Configuration(format!(
            "sync index mask {:#010x} has {} slots, limit is {}",
            mask, count, MAX_SWAPCHAIN_IMAGES
        )));
    }

    Ok(count)
}

/// First memory type allowed by `type_bits` whose flags contain `required`
pub fn find_memory_type(
    properties: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    let count = (properties.memory_type_count as usize).min(vk::MAX_MEMORY_TYPES);

    (0..count)
        .find(|&i| {
            type_bits & (1 << i) != 0 && properties.memory_types[i].property_flags.contains(required)
        })
        .map(|i| i as u32)
}

/// View create info the frontend receives with each image
///
/// Identity swizzle, color aspect, one mip level, one array layer.
pub fn presentable_view_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo<'static> {
    vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        })
}

/// Log a failed object creation at critical level and map it to an error
fn creation_error(what: &str, index: usize, result: vk::Result) -> Error {
    retro_critical!("retro::swapchain::pool", "Unable to {} for swapchain image {} - {:?}", what, index, result);
    match result {
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY | vk::Result::ERROR_OUT_OF_HOST_MEMORY => Error::OutOfMemory,
        other => Error::BackendError(format!("failed to {} for image {}: {:?}", what, index, other)),
    }
}

/// One presentable image and everything it owns
#[derive(Debug, Clone, Copy)]
pub struct SwapchainSlot {
    /// GPU image
    pub image: vk::Image,
    /// Backing device-local memory
    pub memory: vk::DeviceMemory,
    /// 2D view over the whole image
    pub view: vk::ImageView,
    /// Descriptor handed to the frontend
    pub presentable: PresentableImage,
}

/// Fixed-capacity ring of presentable images
///
/// Slots live on the heap: the frontend keeps the `PresentableImage` pointer
/// passed to `set_image` until its next video refresh, so the descriptors must
/// not move when the pool (or the owning swapchain) does.
#[derive(Debug)]
pub struct ImagePool {
    slots: Box<[Option<SwapchainSlot>; MAX_SWAPCHAIN_IMAGES]>,
    len: usize,
    format: vk::Format,
    extent: vk::Extent2D,
}

impl ImagePool {
    /// An empty pool (no GPU objects)
    pub fn empty() -> Self {
        Self {
            slots: Box::new([None; MAX_SWAPCHAIN_IMAGES]),
            len: 0,
            format: vk::Format::UNDEFINED,
            extent: vk::Extent2D { width: 0, height: 0 },
        }
    }

    /// Create `slot_count` image/memory/view triples
    ///
    /// # Arguments
    ///
    /// * `device` - Device that owns every created object
    /// * `format` - Negotiated surface format
    /// * `extent` - Negotiated extent
    /// * `slot_count` - Number of slots the frontend cycles through
    ///
    /// # Errors
    ///
    /// Any creation failure is fatal. Objects already created for earlier
    /// slots (and for the failing slot) are released before returning.
    pub fn allocate(
        device: &dyn SwapchainDevice,
        format: vk::Format,
        extent: vk::Extent2D,
        slot_count: usize,
    ) -> Result<Self> {
        if slot_count > MAX_SWAPCHAIN_IMAGES {
            retro_critical!(
                "retro::swapchain::pool",
                "Requested {} swapchain images, at most {} are supported",
                slot_count,
                MAX_SWAPCHAIN_IMAGES
            );
            return Err(Error::Configuration(format!(
                "{} swapchain images requested, limit is {}",
                slot_count, MAX_SWAPCHAIN_IMAGES
            )));
        }

        let memory_properties = device.memory_properties();
        let mut pool = Self::empty();
        pool.format = format;
        pool.extent = extent;

        for index in 0..slot_count {
            match Self::create_slot(device, &memory_properties, format, extent, index) {
                Ok(slot) => {
                    pool.slots[index] = Some(slot);
                    pool.len += 1;
                }
                Err(e) => {
                    pool.destroy(device);
                    return Err(e);
                }
            }
        }

        retro_info!(
            "retro::swapchain::pool",
            "Created {} swapchain images ({:?}, {}x{})",
            slot_count,
            format,
            extent.width,
            extent.height
        );

        Ok(pool)
    }

    fn create_slot(
        device: &dyn SwapchainDevice,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        format: vk::Format,
        extent: vk::Extent2D,
        index: usize,
    ) -> Result<SwapchainSlot> {
        let image_info = vk::ImageCreateInfo::default()
            .flags(vk::ImageCreateFlags::MUTABLE_FORMAT)
            .image_type(vk::ImageType::TYPE_2D)
            .format(format)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(IMAGE_USAGE)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = device
            .create_image(&image_info)
            .map_err(|e| creation_error("create image", index, e))?;

        let requirements = device.image_memory_requirements(image);
        let memory_type_index = match find_memory_type(
            memory_properties,
            requirements.memory_type_bits,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ) {
            Some(memory_type_index) => memory_type_index,
            None => {
                device.destroy_image(image);
                retro_critical!(
                    "retro::swapchain::pool",
                    "No device-local memory type in mask {:#x} for swapchain image {}",
                    requirements.memory_type_bits,
                    index
                );
                return Err(Error::Configuration("no device-local memory type".to_string()));
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::default()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        let memory = match device.allocate_memory(&alloc_info) {
            Ok(memory) => memory,
            Err(e) => {
                device.destroy_image(image);
                return Err(creation_error("allocate memory", index, e));
            }
        };

        if let Err(e) = device.bind_image_memory(image, memory, 0) {
            device.destroy_image(image);
            device.free_memory(memory);
            return Err(creation_error("bind memory", index, e));
        }

        let create_info = presentable_view_info(image, format);
        let view = match device.create_image_view(&create_info) {
            Ok(view) => view,
            Err(e) => {
                device.destroy_image(image);
                device.free_memory(memory);
                return Err(creation_error("create image view", index, e));
            }
        };

        retro_debug!(
            "retro::swapchain::pool",
            "Image {}: {} bytes in memory type {}",
            index,
            requirements.size,
            memory_type_index
        );

        Ok(SwapchainSlot {
            image,
            memory,
            view,
            presentable: PresentableImage {
                image_view: view,
                image_layout: PRESENT_LAYOUT,
                create_info,
            },
        })
    }

    /// Destroy every view, image and allocation; the pool is empty afterwards
    pub fn destroy(&mut self, device: &dyn SwapchainDevice) {
        for slot in self.slots.iter_mut() {
            if let Some(slot) = slot.take() {
                device.destroy_image_view(slot.view);
                device.destroy_image(slot.image);
                device.free_memory(slot.memory);
            }
        }
        self.len = 0;
        self.format = vk::Format::UNDEFINED;
        self.extent = vk::Extent2D { width: 0, height: 0 };
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the pool holds no slots
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Format of every image
    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// Extent of every image
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Slot at `index`, if allocated
    pub fn slot(&self, index: usize) -> Option<&SwapchainSlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Allocated slots, in sync-index order
    pub fn slots(&self) -> impl Iterator<Item = &SwapchainSlot> {
        self.slots.iter().flatten()
    }

    /// Image handles, in sync-index order
    pub fn images(&self) -> Vec<vk::Image> {
        self.slots().map(|slot| slot.image).collect()
    }

    /// View handles, in sync-index order
    pub fn image_views(&self) -> Vec<vk::ImageView> {
        self.slots().map(|slot| slot.view).collect()
    }
}

impl Default for ImagePool {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for ImagePool {
    fn drop(&mut self) {
        if self.len > 0 {
            retro_error!(
                "retro::swapchain::pool",
                "Image pool dropped with {} live images, GPU memory leaked",
                self.len
            );
        }
    }
}

#[cfg(test)]
#[path = "image_pool_tests.rs"]
mod tests;
