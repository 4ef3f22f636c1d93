// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use crate::address::{Address, PhysAddr, VirtAddr};
use crate::error::HvError;
use crate::utils::MemoryRegion;
use core::slice;

/// Access to host memory for the hypervisor.
pub trait HostMemory {
    /// Translate a host-physical address into a host-virtual one. Returns
    /// [`None`] if the address is not mapped.
    fn hpa2hva(&self, hpa: PhysAddr) -> Option<VirtAddr>;

    /// Borrow `len` bytes of mapped host memory starting at `hva`.
    ///
    /// The returned slice is exclusively borrowed for as long as `self`
    /// is, so nothing else can observe the memory while it is modified.
    fn map_mut(&mut self, hva: VirtAddr, len: usize) -> Result<&mut [u8], HvError>;
}

impl<T: HostMemory + ?Sized> HostMemory for &mut T {
    fn hpa2hva(&self, hpa: PhysAddr) -> Option<VirtAddr> {
        (**self).hpa2hva(hpa)
    }

    fn map_mut(&mut self, hva: VirtAddr, len: usize) -> Result<&mut [u8], HvError> {
        (**self).map_mut(hva, len)
    }
}

/// Host memory that is linearly mapped at a fixed virtual offset, as the
/// hypervisor does for the physical range the bootloader hands over.
#[derive(Debug)]
pub struct DirectMap {
    phys: MemoryRegion<PhysAddr>,
    virt: MemoryRegion<VirtAddr>,
}

impl DirectMap {
    /// Creates a linear mapping of `size` bytes of host-physical memory
    /// starting at `phys`, which is accessible at `virt`.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `[virt, virt + size)` is mapped,
    /// readable and writable, and that nothing else accesses it for the
    /// lifetime of the returned object.
    pub unsafe fn new(phys: PhysAddr, virt: VirtAddr, size: usize) -> Result<Self, HvError> {
        let phys = MemoryRegion::checked_new(phys, size).ok_or(HvError::Mem)?;
        let virt = MemoryRegion::checked_new(virt, size).ok_or(HvError::Mem)?;
        Ok(Self { phys, virt })
    }
}

impl HostMemory for DirectMap {
    fn hpa2hva(&self, hpa: PhysAddr) -> Option<VirtAddr> {
        let offset = self.phys.offset_of(hpa)?;
        self.virt.start().checked_add(offset)
    }

    fn map_mut(&mut self, hva: VirtAddr, len: usize) -> Result<&mut [u8], HvError> {
        if hva.is_null() {
            return Err(HvError::Mem);
        }
        let region = MemoryRegion::checked_new(hva, len).ok_or(HvError::Mem)?;
        if !self.virt.contains_region(&region) {
            return Err(HvError::Mem);
        }

        // SAFETY: the range lies within the mapping whose validity and
        // exclusivity the creator of this object vouched for, and the
        // borrow of `self` keeps any other slice from being handed out.
        Ok(unsafe { slice::from_raw_parts_mut(hva.as_mut_ptr::<u8>(), len) })
    }
}
