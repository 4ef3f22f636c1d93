// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use super::dseed::{DerivedSeed, DerivedSeedList, SeedSink};
use zeroize::Zeroize;

/// Keeps the seeds the trusted environment receives at boot until they
/// are passed on to it when it is launched. Only the most recent delivery
/// is kept; an empty delivery leaves the store empty. The stored seeds are
/// wiped on replacement and on drop.
#[derive(Debug, Default)]
pub struct SeedStore {
    dseed_list: DerivedSeedList,
}

impl SeedStore {
    pub const fn new() -> Self {
        Self {
            dseed_list: DerivedSeedList::new(),
        }
    }

    pub fn seeds(&self) -> &[DerivedSeed] {
        self.dseed_list.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.dseed_list.is_empty()
    }

    pub fn clear(&mut self) {
        self.dseed_list.zeroize();
    }
}

impl SeedSink for SeedStore {
    fn set_dseed(&mut self, dseed_list: Option<&[DerivedSeed]>) {
        self.clear();
        let Some(seeds) = dseed_list else {
            log::info!("No seeds for the trusted environment");
            return;
        };

        for dseed in seeds {
            if !self.dseed_list.push(dseed) {
                log::warn!("Dropping seeds beyond {}", self.dseed_list.len());
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootlib::dev_sec_info::SEED_LEN;

    fn dseed(svn: u8, fill: u8) -> DerivedSeed {
        DerivedSeed {
            cse_svn: svn,
            seed: [fill; SEED_LEN],
        }
    }

    #[test]
    fn store_replace() {
        let mut store = SeedStore::new();
        assert!(store.is_empty());

        store.set_dseed(Some(&[dseed(1, 0x11), dseed(2, 0x22)]));
        assert_eq!(store.seeds(), &[dseed(1, 0x11), dseed(2, 0x22)]);

        store.set_dseed(Some(&[dseed(3, 0x33), dseed(4, 0x44), dseed(5, 0x55)]));
        assert_eq!(store.seeds().len(), 3);
        assert_eq!(store.seeds()[0], dseed(3, 0x33));
    }

    #[test]
    fn store_none_clears() {
        let mut store = SeedStore::new();
        store.set_dseed(Some(&[dseed(1, 0x11), dseed(2, 0x22)]));
        store.set_dseed(None);
        assert!(store.is_empty());
        assert!(store.dseed_list.is_wiped());
    }
}
