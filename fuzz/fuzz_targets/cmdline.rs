// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

#![no_main]

use arbitrary::Arbitrary;
use hvboot::address::{GuestPhysAddr, PhysAddr, VirtAddr};
use hvboot::cmdline::{SeedHandoff, DEV_SEC_INFO_ARG};
use hvboot::mm::{GuestAddressSpace, HostMemory};
use hvboot::seed::{DerivedSeed, SeedSink};
use hvboot::{HvError, SeedConfig};
use libfuzzer_sys::fuzz_target;

const HOST_BASE: usize = 0x1000;
const HOST_SIZE: usize = 0x1000;
const DIRECT_MAP: usize = 0xffff_8880_0000_0000;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    cmdline: Vec<u8>,
    block: Vec<u8>,
    gpa: usize,
    out_len: u8,
}

/// Host memory backed by the fuzzer input.
#[derive(Debug)]
struct FuzzMemory {
    bytes: Vec<u8>,
}

impl HostMemory for FuzzMemory {
    fn hpa2hva(&self, hpa: PhysAddr) -> Option<VirtAddr> {
        let hpa = usize::from(hpa);
        (HOST_BASE..HOST_BASE + HOST_SIZE)
            .contains(&hpa)
            .then(|| VirtAddr::new(DIRECT_MAP + hpa))
    }

    fn map_mut(&mut self, hva: VirtAddr, len: usize) -> Result<&mut [u8], HvError> {
        let off = usize::from(hva)
            .checked_sub(DIRECT_MAP + HOST_BASE)
            .ok_or(HvError::Mem)?;
        let end = off.checked_add(len).ok_or(HvError::Mem)?;
        self.bytes.get_mut(off..end).ok_or(HvError::Mem)
    }
}

#[derive(Debug)]
struct FuzzGuest(GuestPhysAddr);

impl GuestAddressSpace for FuzzGuest {
    fn hva2gpa(&self, _hva: VirtAddr) -> GuestPhysAddr {
        self.0
    }
}

#[derive(Debug, Default)]
struct CountingSink(usize);

impl SeedSink for CountingSink {
    fn set_dseed(&mut self, _dseed_list: Option<&[DerivedSeed]>) {
        self.0 += 1;
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut bytes = input.block;
    bytes.resize(HOST_SIZE, 0);
    let memory = FuzzMemory { bytes };
    let guest = FuzzGuest(GuestPhysAddr::new(input.gpa));

    let mut cmdline = input.cmdline;
    let original = cmdline.clone();
    let mut out = vec![0xffu8; input.out_len.into()];

    let mut handoff = SeedHandoff::new(memory, CountingSink::default(), SeedConfig::default());
    let ok = handoff.rewrite(&guest, Some(&mut cmdline[..]), Some(&mut out[..]));

    assert_eq!(handoff.sink().0, 1);
    assert_eq!(cmdline.len(), original.len());
    if ok {
        let key = DEV_SEC_INFO_ARG.as_bytes();
        let pos = original
            .windows(key.len())
            .position(|w| w == key)
            .unwrap();
        assert_eq!(&cmdline[pos..pos + key.len()], &vec![b' '; key.len()][..]);
        if let Some(nul) = out.iter().position(|b| *b == 0) {
            assert!(key.starts_with(&out[..nul.min(key.len())]));
        }
    } else {
        assert_eq!(cmdline, original);
    }
});
