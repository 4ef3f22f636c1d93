// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Boot-time handoff of the bootloader seeds.
//!
//! The bootloader publishes a block of per-boot seeds in host memory and
//! passes its host-physical address on the service OS command line.
//! [`cmdline::SeedHandoff`] finds that parameter, lets
//! [`seed::SeedExtractor`] move the seeds to the trusted environment and
//! scrub them from host memory, and replaces the parameter with one the
//! guest can use.

#![no_std]

pub mod address;
pub mod cmdline;
pub mod config;
pub mod error;
pub mod mm;
pub mod seed;
pub mod string;
pub mod utils;

pub use cmdline::{rewrite_seed_param, SeedHandoff};
pub use config::SeedConfig;
pub use error::HvError;

#[test]
fn test_nop() {}

// Utilities for test configurations.
#[cfg(test)]
pub mod testutils;
