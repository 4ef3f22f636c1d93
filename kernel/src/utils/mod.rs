// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

pub mod memory_region;

pub use memory_region::MemoryRegion;
