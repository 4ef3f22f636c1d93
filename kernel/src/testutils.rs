// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Test doubles for the collaborators of the seed handoff.

extern crate alloc;

use crate::address::{Address, GuestPhysAddr, PhysAddr, VirtAddr};
use crate::error::HvError;
use crate::mm::{GuestAddressSpace, HostMemory};
use crate::seed::{DerivedSeed, SeedSink};
use alloc::vec;
use alloc::vec::Vec;
use bootlib::dev_sec_info::{
    DevSecInfo, DevSecInfoHeader, SeedRecord, DEV_SEC_INFO_SIZE, SEED_LEN, SEED_LIST_MAX,
};
use core::cell::RefCell;

/// Offset at which [`FakeHostMemory`] pretends host memory is mapped.
pub const FAKE_DIRECT_MAP: usize = 0xffff_8880_0000_0000;

/// A recognizable, non-zero seed for record `index`.
pub fn seed_bytes(index: usize) -> [u8; SEED_LEN] {
    core::array::from_fn(|j| (0x80 | (index << 5) | j) as u8)
}

/// Builds a well-formed seed block with one record per entry in `svns`.
pub fn dev_sec_info(svns: &[u8]) -> DevSecInfo {
    assert!(svns.len() <= SEED_LIST_MAX);
    let mut info = DevSecInfo {
        header: DevSecInfoHeader {
            size_of_this_struct: DEV_SEC_INFO_SIZE as u32,
            version: 1,
            num_seeds: svns.len() as u32,
        },
        ..Default::default()
    };
    for (i, svn) in svns.iter().enumerate() {
        info.seed_list[i] = SeedRecord {
            svn: *svn,
            reserved: [0; 3],
            seed: seed_bytes(i),
        };
    }
    info
}

/// Records every delivery made to the trusted environment.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<Option<Vec<DerivedSeed>>>,
}

impl SeedSink for RecordingSink {
    fn set_dseed(&mut self, dseed_list: Option<&[DerivedSeed]>) {
        self.calls.push(dseed_list.map(<[DerivedSeed]>::to_vec));
    }
}

/// A window of host memory backed by a vector, mapped at
/// [`FAKE_DIRECT_MAP`].
#[derive(Debug)]
pub struct FakeHostMemory {
    base: PhysAddr,
    bytes: Vec<u8>,
}

impl FakeHostMemory {
    pub fn new(base: PhysAddr, len: usize) -> Self {
        Self {
            base,
            bytes: vec![0; len],
        }
    }

    fn offset(&self, hpa: PhysAddr, len: usize) -> Option<usize> {
        let off = hpa.bits().checked_sub(self.base.bits())?;
        (off.checked_add(len)? <= self.bytes.len()).then_some(off)
    }

    pub fn write(&mut self, hpa: PhysAddr, data: &[u8]) {
        let off = self.offset(hpa, data.len()).unwrap();
        self.bytes[off..off + data.len()].copy_from_slice(data);
    }

    pub fn read(&self, hpa: PhysAddr, len: usize) -> &[u8] {
        let off = self.offset(hpa, len).unwrap();
        &self.bytes[off..off + len]
    }
}

impl HostMemory for FakeHostMemory {
    fn hpa2hva(&self, hpa: PhysAddr) -> Option<VirtAddr> {
        self.offset(hpa, 1)?;
        Some(VirtAddr::new(FAKE_DIRECT_MAP + hpa.bits()))
    }

    fn map_mut(&mut self, hva: VirtAddr, len: usize) -> Result<&mut [u8], HvError> {
        let hpa = hva.bits().checked_sub(FAKE_DIRECT_MAP).ok_or(HvError::Mem)?;
        let off = self.offset(PhysAddr::new(hpa), len).ok_or(HvError::Mem)?;
        Ok(&mut self.bytes[off..off + len])
    }
}

/// A guest that maps every host-virtual address to the same guest-physical
/// one, remembering what it was asked.
#[derive(Debug)]
pub struct FixedGuest {
    gpa: GuestPhysAddr,
    queries: RefCell<Vec<VirtAddr>>,
}

impl FixedGuest {
    pub fn new(gpa: GuestPhysAddr) -> Self {
        Self {
            gpa,
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<VirtAddr> {
        self.queries.borrow().clone()
    }
}

impl GuestAddressSpace for FixedGuest {
    fn hva2gpa(&self, hva: VirtAddr) -> GuestPhysAddr {
        self.queries.borrow_mut().push(hva);
        self.gpa
    }
}
