// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

pub mod guest;
pub mod hostmem;

pub use guest::GuestAddressSpace;
pub use hostmem::{DirectMap, HostMemory};
