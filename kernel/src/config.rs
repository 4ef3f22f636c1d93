// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

/// Default length of the command line window that is scanned for the
/// seed parameter.
pub const CMDLINE_SCAN_WINDOW: usize = 2048;

/// Tunables of the seed handoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedConfig {
    /// Maximum number of command line bytes that are inspected, both when
    /// searching for the parameter and when measuring its extent.
    pub scan_window: usize,
    /// Reject seed blocks whose self-reported size does not cover the
    /// advertised number of seeds or exceeds the full block size.
    pub check_struct_size: bool,
}

impl SeedConfig {
    pub const fn new() -> Self {
        Self {
            scan_window: CMDLINE_SCAN_WINDOW,
            check_struct_size: true,
        }
    }

    pub const fn with_scan_window(mut self, scan_window: usize) -> Self {
        self.scan_window = scan_window;
        self
    }

    pub const fn with_struct_size_check(mut self, check: bool) -> Self {
        self.check_struct_size = check;
        self
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SeedConfig::default();
        assert_eq!(config.scan_window, 2048);
        assert!(config.check_struct_size);
    }

    #[test]
    fn builders() {
        let config = SeedConfig::new()
            .with_scan_window(64)
            .with_struct_size_check(false);
        assert_eq!(config.scan_window, 64);
        assert!(!config.check_struct_size);
    }
}
