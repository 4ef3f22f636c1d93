// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use crate::address::{GuestPhysAddr, VirtAddr};

/// The physical address space of a guest VM, as far as the hypervisor
/// needs to expose host memory to it.
pub trait GuestAddressSpace {
    /// Translate a host-virtual address into the guest-physical address
    /// under which the guest sees the same memory.
    fn hva2gpa(&self, hva: VirtAddr) -> GuestPhysAddr;
}
