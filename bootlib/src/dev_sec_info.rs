// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Layout of the device security information block that the bootloader
//! publishes in host memory and advertises through the
//! `dev_sec_info.param_addr=` command line parameter.
//!
//! The layout is a fixed binary contract with the bootloader: a 12-byte
//! header followed by up to [`SEED_LIST_MAX`] seed records of 36 bytes each.
//! All integers are little-endian.

use core::mem::size_of;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Length in bytes of a single seed.
pub const SEED_LEN: usize = 32;

/// Maximum number of seed records the bootloader can publish.
pub const SEED_LIST_MAX: usize = 4;

/// Minimum number of seed records in a valid block. The bootloader always
/// provides the legacy seed plus at least one SVN-based seed.
pub const SEED_LIST_MIN: usize = 2;

/// A single seed as stored by the bootloader.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SeedRecord {
    /// Security version number the seed belongs to.
    pub svn: u8,

    #[doc(hidden)]
    pub reserved: [u8; 3],

    /// The seed itself.
    pub seed: [u8; SEED_LEN],
}

/// The fixed header in front of the seed list.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DevSecInfoHeader {
    /// Size of the whole block as reported by the bootloader.
    pub size_of_this_struct: u32,

    /// Layout version as reported by the bootloader.
    pub version: u32,

    /// Number of valid entries in the seed list.
    pub num_seeds: u32,
}

/// The complete device security information block.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DevSecInfo {
    pub header: DevSecInfoHeader,
    pub seed_list: [SeedRecord; SEED_LIST_MAX],
}

pub const SEED_RECORD_SIZE: usize = size_of::<SeedRecord>();
pub const DEV_SEC_INFO_HEADER_SIZE: usize = size_of::<DevSecInfoHeader>();
pub const DEV_SEC_INFO_SIZE: usize = size_of::<DevSecInfo>();

const _: () = assert!(SEED_RECORD_SIZE == 36);
const _: () = assert!(DEV_SEC_INFO_HEADER_SIZE == 12);
const _: () = assert!(DEV_SEC_INFO_SIZE == 156);

impl DevSecInfo {
    /// Number of bytes covered by the header and `num_seeds` records.
    pub const fn span_for(num_seeds: usize) -> usize {
        DEV_SEC_INFO_HEADER_SIZE + num_seeds * SEED_RECORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_offsets() {
        let mut info = DevSecInfo::default();
        info.header.size_of_this_struct = 0x9c;
        info.header.version = 1;
        info.header.num_seeds = 2;
        info.seed_list[1].svn = 7;
        info.seed_list[1].seed = [0xaa; SEED_LEN];

        let bytes = info.as_bytes();
        assert_eq!(&bytes[0..4], &[0x9c, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[2, 0, 0, 0]);
        // Second record starts after the header and one full record.
        assert_eq!(bytes[12 + 36], 7);
        assert!(bytes[12 + 36 + 4..12 + 72].iter().all(|b| *b == 0xaa));
    }

    #[test]
    fn span() {
        assert_eq!(DevSecInfo::span_for(0), 12);
        assert_eq!(DevSecInfo::span_for(2), 84);
        assert_eq!(DevSecInfo::span_for(SEED_LIST_MAX), DEV_SEC_INFO_SIZE);
    }
}
