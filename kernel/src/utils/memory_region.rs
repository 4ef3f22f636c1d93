// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use crate::address::Address;

/// A contiguous range of host-physical ([`PhysAddr`](crate::address::PhysAddr))
/// or host-virtual ([`VirtAddr`](crate::address::VirtAddr)) addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion<A> {
    start: A,
    end: A,
}

impl<A> MemoryRegion<A>
where
    A: Address,
{
    /// Create a new memory region with overflow checks.
    ///
    /// ```rust
    /// # use hvboot::address::PhysAddr;
    /// # use hvboot::utils::MemoryRegion;
    /// let region = MemoryRegion::checked_new(PhysAddr::new(usize::MAX), 16);
    /// assert!(region.is_none());
    /// ```
    pub fn checked_new(start: A, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        Some(Self { start, end })
    }

    #[inline]
    pub const fn start(&self) -> A {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> A {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.bits().saturating_sub(self.start.bits())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether an address is within this region.
    ///
    /// ```rust
    /// # use hvboot::address::PhysAddr;
    /// # use hvboot::utils::MemoryRegion;
    /// let region = MemoryRegion::checked_new(PhysAddr::new(0x1000), 0x100).unwrap();
    /// assert!(region.contains(PhysAddr::new(0x10ff)));
    /// assert!(!region.contains(PhysAddr::new(0x1100)));
    /// ```
    pub fn contains(&self, addr: A) -> bool {
        self.start() <= addr && addr < self.end()
    }

    /// Check whether this region fully contains a different region.
    pub fn contains_region(&self, other: &Self) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    /// Offset of `addr` from the start of the region, if it lies within.
    pub fn offset_of(&self, addr: A) -> Option<usize> {
        self.contains(addr).then(|| addr.bits() - self.start().bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{PhysAddr, VirtAddr};

    #[test]
    fn region_bounds() {
        let r = MemoryRegion::checked_new(VirtAddr::new(0x4000), 0x1000).unwrap();
        assert_eq!(r.len(), 0x1000);
        assert_eq!(r.end(), VirtAddr::new(0x5000));
        assert!(!r.is_empty());

        let inner = MemoryRegion::checked_new(VirtAddr::new(0x4f00), 0x100).unwrap();
        let outer = MemoryRegion::checked_new(VirtAddr::new(0x4f00), 0x101).unwrap();
        assert!(r.contains_region(&inner));
        assert!(!r.contains_region(&outer));
    }

    #[test]
    fn region_offset() {
        let r = MemoryRegion::checked_new(PhysAddr::new(0x1000), 0x10).unwrap();
        assert_eq!(r.offset_of(PhysAddr::new(0x1008)), Some(8));
        assert_eq!(r.offset_of(PhysAddr::new(0x1010)), None);
        assert_eq!(r.offset_of(PhysAddr::new(0xfff)), None);
    }
}
