// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Definitions of the structures the bootloader hands over to the
//! hypervisor at boot. They are shared with any tool that has to build or
//! inspect such a handoff.

#![no_std]

pub mod dev_sec_info;
