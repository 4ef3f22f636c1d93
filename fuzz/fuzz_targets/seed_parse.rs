// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

#![no_main]

use bootlib::dev_sec_info::{SeedRecord, DEV_SEC_INFO_HEADER_SIZE, SEED_LEN};
use hvboot::seed::{DerivedSeed, DerivedSeedList, SeedExtractor, SeedSink};
use hvboot::SeedConfig;
use libfuzzer_sys::{fuzz_target, Corpus};
use zerocopy::FromBytes;

/// Keeps the SVNs of every delivery.
#[derive(Debug, Default)]
struct SvnSink {
    calls: Vec<Option<Vec<u8>>>,
}

impl SeedSink for SvnSink {
    fn set_dseed(&mut self, dseed_list: Option<&[DerivedSeed]>) {
        self.calls
            .push(dseed_list.map(|l| l.iter().map(|d| d.cse_svn).collect()));
    }
}

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() < DEV_SEC_INFO_HEADER_SIZE {
        return Corpus::Reject;
    }

    let mut region = data.to_vec();
    let mut scratch = DerivedSeedList::new();
    let mut extractor = SeedExtractor::new(SvnSink::default(), SeedConfig::default());
    extractor.extract_with(Some(&mut region[..]), &mut scratch);

    assert!(scratch.is_wiped());
    let sink = extractor.into_sink();
    assert_eq!(sink.calls.len(), 1);

    match &sink.calls[0] {
        None => assert_eq!(region, data),
        Some(svns) => {
            let legacy = svns
                .iter()
                .enumerate()
                .min_by_key(|(i, svn)| (**svn, *i))
                .map(|(i, _)| i)
                .unwrap();
            let (records, _) = <[SeedRecord]>::ref_from_prefix_with_elems(
                &region[DEV_SEC_INFO_HEADER_SIZE..],
                svns.len(),
            )
            .unwrap();
            let (orig, _) = <[SeedRecord]>::ref_from_prefix_with_elems(
                &data[DEV_SEC_INFO_HEADER_SIZE..],
                svns.len(),
            )
            .unwrap();
            for (i, (record, orig)) in records.iter().zip(orig).enumerate() {
                if i == legacy {
                    assert_eq!(record.seed, orig.seed);
                } else {
                    assert_eq!(record.seed, [0; SEED_LEN]);
                }
            }
        }
    }

    Corpus::Keep
});
