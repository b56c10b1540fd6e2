//! libretro Vulkan hardware-render interface
//!
//! `#[repr(C)]` mirrors of the parts of `libretro.h` / `libretro_vulkan.h`
//! the swapchain consumes. Field order and types must match the C headers
//! exactly; the frontend hands us a pointer to its own instance of
//! [`retro_hw_render_interface_vulkan`].

#![allow(non_camel_case_types)]

use ash::vk;
use std::os::raw::{c_char, c_uint, c_void};

pub use retro_swapchain::retro::swapchain::PresentableImage as retro_vulkan_image;

/// `RETRO_HW_RENDER_INTERFACE_VULKAN`
pub const RETRO_HW_RENDER_INTERFACE_VULKAN: c_uint = 0;

/// `RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION`
pub const RETRO_HW_RENDER_INTERFACE_VULKAN_VERSION: c_uint = 5;

/// `enum retro_log_level`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum retro_log_level {
    RETRO_LOG_DEBUG = 0,
    RETRO_LOG_INFO = 1,
    RETRO_LOG_WARN = 2,
    RETRO_LOG_ERROR = 3,
}

/// `retro_log_printf_t`
pub type retro_log_printf_t = Option<unsafe extern "C" fn(level: retro_log_level, fmt: *const c_char, ...)>;

pub type retro_vulkan_set_image_t = Option<
    unsafe extern "C" fn(
        handle: *mut c_void,
        image: *const retro_vulkan_image,
        num_semaphores: u32,
        semaphores: *const vk::Semaphore,
        src_queue_family: u32,
    ),
>;

pub type retro_vulkan_get_sync_index_t = Option<unsafe extern "C" fn(handle: *mut c_void) -> u32>;

pub type retro_vulkan_get_sync_index_mask_t = Option<unsafe extern "C" fn(handle: *mut c_void) -> u32>;

pub type retro_vulkan_set_command_buffers_t =
    Option<unsafe extern "C" fn(handle: *mut c_void, num_cmd: u32, cmd: *const vk::CommandBuffer)>;

pub type retro_vulkan_wait_sync_index_t = Option<unsafe extern "C" fn(handle: *mut c_void)>;

pub type retro_vulkan_lock_queue_t = Option<unsafe extern "C" fn(handle: *mut c_void)>;

pub type retro_vulkan_unlock_queue_t = Option<unsafe extern "C" fn(handle: *mut c_void)>;

pub type retro_vulkan_set_signal_semaphore_t = Option<unsafe extern "C" fn(handle: *mut c_void, semaphore: vk::Semaphore)>;

/// `struct retro_hw_render_interface_vulkan`
#[repr(C)]
#[derive(Clone, Copy)]
pub struct retro_hw_render_interface_vulkan {
    pub interface_type: c_uint,
    pub interface_version: c_uint,

    pub handle: *mut c_void,

    pub instance: vk::Instance,
    pub gpu: vk::PhysicalDevice,
    pub device: vk::Device,

    pub get_device_proc_addr: Option<vk::PFN_vkGetDeviceProcAddr>,
    pub get_instance_proc_addr: Option<vk::PFN_vkGetInstanceProcAddr>,

    pub queue: vk::Queue,
    pub queue_index: c_uint,

    pub set_image: retro_vulkan_set_image_t,
    pub get_sync_index: retro_vulkan_get_sync_index_t,
    pub get_sync_index_mask: retro_vulkan_get_sync_index_mask_t,
    pub set_command_buffers: retro_vulkan_set_command_buffers_t,
    pub wait_sync_index: retro_vulkan_wait_sync_index_t,
    pub lock_queue: retro_vulkan_lock_queue_t,
    pub unlock_queue: retro_vulkan_unlock_queue_t,
    pub set_signal_semaphore: retro_vulkan_set_signal_semaphore_t,
}

#[cfg(test)]
#[path = "libretro_tests.rs"]
mod tests;
