// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

use crate::cmdline::CmdlineError;
use crate::seed::SeedError;
use core::fmt;

// As a general rule, functions private to a given module may use the
// leaf error types. Public functions should return an HvError
// containing a leaf error type, usually the one corresponding to
// that module. We always provide a way to convert a leaf error into
// a HvError via the From trait at the module level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HvError {
    // Errors related to locating the parameter in the command line
    Cmdline(CmdlineError),
    // Errors related to decoding the bootloader seed block
    Seed(SeedError),
    // Host memory could not be mapped
    Mem,
}

impl fmt::Display for HvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cmdline(e) => write!(f, "command line: {e}"),
            Self::Seed(e) => write!(f, "seed block: {e}"),
            Self::Mem => f.write_str("host memory not mapped"),
        }
    }
}
