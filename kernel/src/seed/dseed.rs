// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use bootlib::dev_sec_info::{SeedRecord, SEED_LEN, SEED_LIST_MAX};
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Capacity of the seed list handed to the trusted environment.
pub const BOOTLOADER_SEED_MAX_ENTRIES: usize = 10;

const _: () = assert!(SEED_LIST_MAX <= BOOTLOADER_SEED_MAX_ENTRIES);

/// A seed as forwarded to the trusted environment.
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
pub struct DerivedSeed {
    /// SVN of the firmware the seed belongs to.
    pub cse_svn: u8,
    pub seed: [u8; SEED_LEN],
}

impl DerivedSeed {
    const EMPTY: Self = Self {
        cse_svn: 0,
        seed: [0; SEED_LEN],
    };

    pub fn is_zero(&self) -> bool {
        self.cse_svn == 0 && self.seed.iter().all(|b| *b == 0)
    }
}

// Never print seed material.
impl fmt::Debug for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedSeed")
            .field("cse_svn", &self.cse_svn)
            .finish_non_exhaustive()
    }
}

/// Fixed-capacity list of [`DerivedSeed`]s. The content is wiped when the
/// list is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedSeedList {
    entries: [DerivedSeed; BOOTLOADER_SEED_MAX_ENTRIES],
    len: usize,
}

impl DerivedSeedList {
    pub const fn new() -> Self {
        Self {
            entries: [DerivedSeed::EMPTY; BOOTLOADER_SEED_MAX_ENTRIES],
            len: 0,
        }
    }

    /// Appends a copy of `record`. The seed bytes are copied straight into
    /// the list so no other copy is left behind. Returns `false` when the
    /// list is full.
    pub fn push_record(&mut self, record: &SeedRecord) -> bool {
        self.push_parts(record.svn, &record.seed)
    }

    /// Appends a copy of `dseed`. Returns `false` when the list is full.
    pub fn push(&mut self, dseed: &DerivedSeed) -> bool {
        self.push_parts(dseed.cse_svn, &dseed.seed)
    }

    fn push_parts(&mut self, svn: u8, seed: &[u8; SEED_LEN]) -> bool {
        let Some(slot) = self.entries.get_mut(self.len) else {
            return false;
        };
        slot.cse_svn = svn;
        slot.seed.copy_from_slice(seed);
        self.len += 1;
        true
    }

    pub fn as_slice(&self) -> &[DerivedSeed] {
        &self.entries[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every byte of the list, including unused entries, is zero.
    pub fn is_wiped(&self) -> bool {
        self.len == 0 && self.entries.iter().all(DerivedSeed::is_zero)
    }
}

impl Default for DerivedSeedList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DerivedSeedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// The interface through which seeds are handed to the trusted
/// environment.
pub trait SeedSink {
    /// Delivers the seeds for this boot. [`None`] signals that no usable
    /// seed is available, otherwise the slice holds between two and four
    /// seeds in bootloader order. Implementations must copy what they need
    /// because the caller wipes the slice right after this returns.
    fn set_dseed(&mut self, dseed_list: Option<&[DerivedSeed]>);
}

impl<T: SeedSink + ?Sized> SeedSink for &mut T {
    fn set_dseed(&mut self, dseed_list: Option<&[DerivedSeed]>) {
        (**self).set_dseed(dseed_list)
    }
}
