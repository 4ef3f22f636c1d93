// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Extraction of the per-boot seeds published by the bootloader.
//!
//! The bootloader provides a list of seeds, each tagged with the SVN of the
//! firmware it belongs to. The seed with the lowest SVN is the legacy seed,
//! which is not bound to an SVN: the service OS derives its RPMB key from it
//! later in the boot, so it stays in host memory. All seeds are copied out
//! and handed to the trusted environment, and every seed other than the
//! legacy one is wiped from host memory.

pub mod dseed;
pub mod store;

pub use dseed::{DerivedSeed, DerivedSeedList, SeedSink, BOOTLOADER_SEED_MAX_ENTRIES};
pub use store::SeedStore;

use crate::config::SeedConfig;
use crate::error::HvError;
use bootlib::dev_sec_info::{
    DevSecInfo, DevSecInfoHeader, SeedRecord, DEV_SEC_INFO_HEADER_SIZE, DEV_SEC_INFO_SIZE,
    SEED_LIST_MAX, SEED_LIST_MIN,
};
use core::fmt;
use core::ops::{Deref, DerefMut};
use zerocopy::FromBytes;
use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedError {
    /// No seed block was provided.
    StructureAbsent,
    /// The block is shorter than its header and seed list require.
    Truncated,
    /// The number of seeds is outside of the supported range.
    InvalidSeedCount(u32),
    /// The self-reported block size does not match the seed count.
    InvalidStructSize(u32),
}

impl From<SeedError> for HvError {
    fn from(err: SeedError) -> Self {
        Self::Seed(err)
    }
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructureAbsent => f.write_str("no seed block"),
            Self::Truncated => f.write_str("seed block truncated"),
            Self::InvalidSeedCount(n) => write!(f, "invalid number of seeds {n}"),
            Self::InvalidStructSize(n) => write!(f, "invalid seed block size {n}"),
        }
    }
}

/// Returns the index of the legacy seed: the first record with the lowest
/// SVN.
pub fn legacy_seed_index(records: &[SeedRecord]) -> usize {
    let mut legacy = 0;
    for (i, record) in records.iter().enumerate().skip(1) {
        if record.svn < records[legacy].svn {
            legacy = i;
        }
    }
    legacy
}

/// Wipes the borrowed seed list whenever it goes out of scope, whichever
/// way the extraction ends.
struct WipeOnExit<'a>(&'a mut DerivedSeedList);

impl Deref for WipeOnExit<'_> {
    type Target = DerivedSeedList;

    fn deref(&self) -> &DerivedSeedList {
        self.0
    }
}

impl DerefMut for WipeOnExit<'_> {
    fn deref_mut(&mut self) -> &mut DerivedSeedList {
        self.0
    }
}

impl Drop for WipeOnExit<'_> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Parses the bootloader seed block and hands the seeds to a [`SeedSink`].
#[derive(Debug)]
pub struct SeedExtractor<S> {
    sink: S,
    config: SeedConfig,
}

impl<S: SeedSink> SeedExtractor<S> {
    pub fn new(sink: S, config: SeedConfig) -> Self {
        Self { sink, config }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Extracts the seeds from `region`, which holds the bootloader seed
    /// block, or is [`None`] if no block is available.
    ///
    /// The sink is called exactly once: with the seeds on success, or with
    /// [`None`] if the block is missing or invalid. On success, all seeds
    /// except the legacy one are wiped from `region`. On failure `region`
    /// is left untouched.
    pub fn extract(&mut self, region: Option<&mut [u8]>) {
        let mut dseed_list = DerivedSeedList::new();
        self.extract_with(region, &mut dseed_list);
    }

    /// Same as [`SeedExtractor::extract()`], with a caller-provided buffer
    /// for the transient seed copies. The buffer is wiped before this
    /// returns.
    pub fn extract_with(&mut self, region: Option<&mut [u8]>, dseed_list: &mut DerivedSeedList) {
        let mut dseed_list = WipeOnExit(dseed_list);
        if let Err(e) = self.parse_seed_list(region, &mut dseed_list) {
            log::warn!("Seed extraction failed: {e}");
            self.sink.set_dseed(None);
        }
    }

    fn parse_seed_list(
        &mut self,
        region: Option<&mut [u8]>,
        dseed_list: &mut DerivedSeedList,
    ) -> Result<(), SeedError> {
        let region = region.ok_or(SeedError::StructureAbsent)?;
        let (header_bytes, list_bytes) = region
            .split_at_mut_checked(DEV_SEC_INFO_HEADER_SIZE)
            .ok_or(SeedError::Truncated)?;
        let header =
            DevSecInfoHeader::read_from_bytes(header_bytes).map_err(|_| SeedError::Truncated)?;

        let num_seeds = header.num_seeds;
        let count = usize::try_from(num_seeds)
            .ok()
            .filter(|n| (SEED_LIST_MIN..=SEED_LIST_MAX).contains(n))
            .ok_or(SeedError::InvalidSeedCount(num_seeds))?;

        let struct_size = header.size_of_this_struct;
        // The bootloader defines no version values, so it is only logged.
        let version = header.version;
        if self.config.check_struct_size {
            let size = struct_size as usize;
            if size < DevSecInfo::span_for(count) || size > DEV_SEC_INFO_SIZE {
                return Err(SeedError::InvalidStructSize(struct_size));
            }
        }

        let (records, _) = <[SeedRecord]>::mut_from_prefix_with_elems(list_bytes, count)
            .map_err(|_| SeedError::Truncated)?;

        let legacy = legacy_seed_index(records);

        dseed_list.zeroize();
        for (i, record) in records.iter_mut().enumerate() {
            let pushed = dseed_list.push_record(record);
            debug_assert!(pushed);
            if i != legacy {
                record.seed.zeroize();
            }
        }

        log::info!(
            "Handing {} seeds to the trusted environment (version {}, legacy index {})",
            count,
            version,
            legacy
        );
        self.sink.set_dseed(Some(dseed_list.as_slice()));
        Ok(())
    }
}
