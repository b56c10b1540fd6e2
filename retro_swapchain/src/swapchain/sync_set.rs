/// Per-slot semaphore pairs

use ash::vk;

use crate::error::{Error, Result};
use crate::swapchain::{SwapchainDevice, MAX_SWAPCHAIN_IMAGES};
use crate::{retro_critical, retro_error};

/// Semaphores bound to one slot of the image ring
#[derive(Debug, Clone, Copy)]
pub struct SyncPair {
    /// Signalled when the image may be rendered to
    pub image_acquired: vk::Semaphore,
    /// Signalled when rendering finished and the image may be displayed
    pub present_ready: vk::Semaphore,
}

/// One [`SyncPair`] per pool slot
#[derive(Debug)]
pub struct SyncSet {
    pairs: [Option<SyncPair>; MAX_SWAPCHAIN_IMAGES],
    len: usize,
}

impl SyncSet {
    /// An empty set
    pub fn empty() -> Self {
        Self {
            pairs: [None; MAX_SWAPCHAIN_IMAGES],
            len: 0,
        }
    }

    /// Create `count` semaphore pairs
    ///
    /// On failure every semaphore created so far is destroyed.
    pub fn create(device: &dyn SwapchainDevice, count: usize) -> Result<Self> {
        if count > MAX_SWAPCHAIN_IMAGES {
            retro_critical!("retro::swapchain::sync", "Requested {} semaphore pairs", count);
            return Err(Error::Configuration(format!(
                "{} semaphore pairs requested, limit is {}",
                count, MAX_SWAPCHAIN_IMAGES
            )));
        }

        let mut set = Self::empty();

        for index in 0..count {
            let image_acquired = match device.create_semaphore() {
                Ok(semaphore) => semaphore,
                Err(e) => {
                    set.destroy(device);
                    return Err(semaphore_error(index, e));
                }
            };

            let present_ready = match device.create_semaphore() {
                Ok(semaphore) => semaphore,
                Err(e) => {
                    device.destroy_semaphore(image_acquired);
                    set.destroy(device);
                    return Err(semaphore_error(index, e));
                }
            };

            set.pairs[index] = Some(SyncPair { image_acquired, present_ready });
            set.len += 1;
        }

        Ok(set)
    }

    /// Destroy every semaphore; the set is empty afterwards
    pub fn destroy(&mut self, device: &dyn SwapchainDevice) {
        for pair in self.pairs.iter_mut() {
            if let Some(pair) = pair.take() {
                device.destroy_semaphore(pair.image_acquired);
                device.destroy_semaphore(pair.present_ready);
            }
        }
        self.len = 0;
    }

    /// Pair for slot `index`
    pub fn pair(&self, index: usize) -> Option<&SyncPair> {
        self.pairs.get(index).and_then(Option::as_ref)
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no pairs
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for SyncSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for SyncSet {
    fn drop(&mut self) {
        if self.len > 0 {
            retro_error!("retro::swapchain::sync", "Sync set dropped with {} live pairs", self.len);
        }
    }
}

fn semaphore_error(index: usize, result: vk::Result) -> Error {
    retro_critical!("retro::swapchain::sync", "Failed to create semaphores for slot {}: {:?}", index, result);
    match result {
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY | vk::Result::ERROR_OUT_OF_HOST_MEMORY => Error::OutOfMemory,
        other => Error::BackendError(format!("failed to create semaphore for slot {}: {:?}", index, other)),
    }
}

#[cfg(test)]
#[path = "sync_set_tests.rs"]
mod tests;
