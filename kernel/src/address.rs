// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Strongly typed addresses for the three address spaces the seed handoff
//! crosses: host-physical ([`PhysAddr`]), host-virtual ([`VirtAddr`]) and
//! guest-physical ([`GuestPhysAddr`]).

use core::fmt;
use core::ops;

// The backing type to represent an address;
type InnerAddr = usize;

const SIGN_BIT: usize = 47;

#[inline]
const fn sign_extend(addr: InnerAddr) -> InnerAddr {
    let mask = 1usize << SIGN_BIT;
    if (addr & mask) == mask {
        addr | !((1usize << SIGN_BIT) - 1)
    } else {
        addr & ((1usize << SIGN_BIT) - 1)
    }
}

pub trait Address:
    Copy + From<InnerAddr> + Into<InnerAddr> + PartialEq + Eq + PartialOrd + Ord
{
    /// Transform the address into its inner representation for easier
    /// arithmetic manipulation
    #[inline]
    fn bits(&self) -> InnerAddr {
        (*self).into()
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.bits() == 0
    }

    #[inline]
    fn checked_add(&self, off: InnerAddr) -> Option<Self> {
        self.bits().checked_add(off).map(|addr| addr.into())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PhysAddr(InnerAddr);

impl PhysAddr {
    #[inline]
    pub const fn new(p: InnerAddr) -> Self {
        Self(p)
    }
}

impl fmt::LowerHex for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<InnerAddr> for PhysAddr {
    #[inline]
    fn from(addr: InnerAddr) -> PhysAddr {
        Self(addr)
    }
}

impl From<PhysAddr> for InnerAddr {
    #[inline]
    fn from(addr: PhysAddr) -> InnerAddr {
        addr.0
    }
}

impl TryFrom<u64> for PhysAddr {
    type Error = core::num::TryFromIntError;

    #[inline]
    fn try_from(addr: u64) -> Result<Self, Self::Error> {
        usize::try_from(addr).map(PhysAddr::from)
    }
}

impl ops::Add<InnerAddr> for PhysAddr {
    type Output = Self;

    #[inline]
    fn add(self, other: InnerAddr) -> Self {
        PhysAddr::from(self.0 + other)
    }
}

impl Address for PhysAddr {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VirtAddr(InnerAddr);

impl VirtAddr {
    #[inline]
    pub const fn null() -> Self {
        Self(0)
    }

    // const traits experimental, so for now we need this to make up
    // for the lack of VirtAddr::from() in const contexts.
    #[inline]
    pub const fn new(addr: InnerAddr) -> Self {
        Self(sign_extend(addr))
    }

    #[inline]
    pub fn as_mut_ptr<T>(&self) -> *mut T {
        self.0 as *mut T
    }
}

impl From<InnerAddr> for VirtAddr {
    #[inline]
    fn from(addr: InnerAddr) -> Self {
        Self(sign_extend(addr))
    }
}

impl From<VirtAddr> for InnerAddr {
    #[inline]
    fn from(addr: VirtAddr) -> Self {
        addr.0
    }
}

impl<T> From<*mut T> for VirtAddr {
    fn from(ptr: *mut T) -> Self {
        Self(ptr as InnerAddr)
    }
}

impl ops::Add<InnerAddr> for VirtAddr {
    type Output = VirtAddr;

    fn add(self, other: InnerAddr) -> Self {
        VirtAddr::from(self.0 + other)
    }
}

impl Address for VirtAddr {
    #[inline]
    fn checked_add(&self, off: InnerAddr) -> Option<Self> {
        self.bits()
            .checked_add(off)
            .map(|addr| sign_extend(addr).into())
    }
}

/// An address in the physical address space of a guest. Guest-physical
/// addresses are not identity mapped to host-physical ones and must never
/// be mixed up with [`PhysAddr`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct GuestPhysAddr(InnerAddr);

impl GuestPhysAddr {
    #[inline]
    pub const fn new(addr: InnerAddr) -> Self {
        Self(addr)
    }
}

impl fmt::LowerHex for GuestPhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for GuestPhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<InnerAddr> for GuestPhysAddr {
    #[inline]
    fn from(addr: InnerAddr) -> Self {
        Self(addr)
    }
}

impl From<GuestPhysAddr> for InnerAddr {
    #[inline]
    fn from(addr: GuestPhysAddr) -> Self {
        addr.0
    }
}

impl Address for GuestPhysAddr {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        assert!(PhysAddr::new(0).is_null());
        assert!(VirtAddr::null().is_null());
        assert!(!GuestPhysAddr::new(0x2000).is_null());
    }

    #[test]
    fn test_virt_sign_extend() {
        let va = VirtAddr::new(0x0000_8000_0000_1000);
        assert_eq!(va.bits(), 0xffff_8000_0000_1000);
        let va = VirtAddr::new(0xffff_7fff_0000_1000);
        assert_eq!(va.bits(), 0x0000_7fff_0000_1000);
    }

    #[test]
    fn test_checked_arith() {
        let pa = PhysAddr::new(usize::MAX - 4);
        assert!(pa.checked_add(8).is_none());
        assert_eq!(pa.checked_add(4), Some(PhysAddr::new(usize::MAX)));
        let va = VirtAddr::new(0x7fff_ffff_f000);
        assert_eq!(va.checked_add(0x1000), Some(VirtAddr::new(0xffff_8000_0000_0000)));
    }

    #[test]
    fn test_phys_from_u64() {
        assert_eq!(PhysAddr::try_from(0x1000u64), Ok(PhysAddr::new(0x1000)));
    }

    #[test]
    fn test_gpa_hex() {
        extern crate alloc;
        use alloc::format;

        let gpa = GuestPhysAddr::new(0xabc0);
        assert_eq!(format!("{:#X}", gpa), "0xABC0");
        assert_eq!(format!("{:x}", gpa), "abc0");
    }
}
