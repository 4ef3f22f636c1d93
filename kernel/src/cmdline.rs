// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Handling of the `dev_sec_info.param_addr=` command line parameter.
//!
//! The bootloader passes the host-physical address of its seed block in
//! the command line of the service OS. That address is meaningless to the
//! guest, whose physical address space is not identity mapped, so the
//! parameter is blanked out and a replacement carrying the guest-physical
//! address is produced for the caller to append when it composes the
//! guest command line.

use crate::address::{Address, PhysAddr};
use crate::config::SeedConfig;
use crate::error::HvError;
use crate::mm::{GuestAddressSpace, HostMemory};
use crate::seed::{SeedExtractor, SeedSink};
use crate::string::{find_bounded, find_byte, parse_hex, strnlen, SliceWriter};
use bootlib::dev_sec_info::DEV_SEC_INFO_SIZE;
use core::fmt::{self, Write};

/// The parameter carrying the address of the bootloader seed block.
pub const DEV_SEC_INFO_ARG: &str = "dev_sec_info.param_addr=";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmdlineError {
    /// No command line was provided.
    MissingCommandLine,
    /// The parameter is not within the scanned part of the command line.
    ParameterNotFound,
    /// The parameter value is not a valid, mapped host-physical address.
    AddressTranslationFailed,
}

impl From<CmdlineError> for HvError {
    fn from(err: CmdlineError) -> Self {
        Self::Cmdline(err)
    }
}

impl fmt::Display for CmdlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommandLine => f.write_str("no command line"),
            Self::ParameterNotFound => write!(f, "{DEV_SEC_INFO_ARG} not found"),
            Self::AddressTranslationFailed => write!(f, "bad {DEV_SEC_INFO_ARG} address"),
        }
    }
}

/// Writes the replacement parameter for guest-physical address `gpa` into
/// `out`, truncated to fit and NUL terminated. The trailing space lets the
/// caller concatenate it with further parameters. Returns the number of
/// bytes written, excluding the NUL.
pub fn format_param(out: &mut [u8], gpa: impl fmt::UpperHex) -> usize {
    let mut w = SliceWriter::new(out);
    // SliceWriter truncates instead of failing.
    let _ = write!(w, "{DEV_SEC_INFO_ARG}{gpa:#X} ");
    w.finish()
}

/// Moves the bootloader seeds from host memory to the trusted environment
/// and rewrites the command line parameter pointing at them.
#[derive(Debug)]
pub struct SeedHandoff<M, S> {
    memory: M,
    extractor: SeedExtractor<S>,
}

impl<M: HostMemory, S: SeedSink> SeedHandoff<M, S> {
    pub fn new(memory: M, sink: S, config: SeedConfig) -> Self {
        Self {
            memory,
            extractor: SeedExtractor::new(sink, config),
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn sink(&self) -> &S {
        self.extractor.sink()
    }

    pub fn into_parts(self) -> (M, S) {
        (self.memory, self.extractor.into_sink())
    }

    /// Parses the seed block referenced by `cmdline` for the VM described
    /// by `vm`.
    ///
    /// On success the seeds have been handed to the trusted environment,
    /// the parameter has been overwritten with spaces in `cmdline`, and, if
    /// `out` is given, the replacement parameter with the guest-physical
    /// address of the block has been written to it.
    ///
    /// On failure the trusted environment is told that no seeds are
    /// available, `cmdline` is left untouched and `false` is returned.
    pub fn rewrite(
        &mut self,
        vm: &dyn GuestAddressSpace,
        cmdline: Option<&mut [u8]>,
        out: Option<&mut [u8]>,
    ) -> bool {
        match self.try_rewrite(vm, cmdline, out) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to parse seed parameter: {e}");
                self.extractor.extract(None);
                false
            }
        }
    }

    fn try_rewrite(
        &mut self,
        vm: &dyn GuestAddressSpace,
        cmdline: Option<&mut [u8]>,
        out: Option<&mut [u8]>,
    ) -> Result<(), CmdlineError> {
        let cmdline = cmdline.ok_or(CmdlineError::MissingCommandLine)?;
        let scan_window = self.extractor.config().scan_window;
        let window = strnlen(cmdline, scan_window);

        let arg = find_bounded(&cmdline[..window], DEV_SEC_INFO_ARG.as_bytes())
            .ok_or(CmdlineError::ParameterNotFound)?;
        // Only the key has to lie within the window, the value is measured
        // from the key on.
        let len = token_len(&cmdline[arg..], scan_window)
            .ok_or(CmdlineError::AddressTranslationFailed)?;
        let token = &mut cmdline[arg..arg + len];

        let hpa = token
            .get(DEV_SEC_INFO_ARG.len()..)
            .and_then(parse_hex)
            .and_then(|v| PhysAddr::try_from(v).ok())
            .filter(|hpa| !hpa.is_null())
            .ok_or(CmdlineError::AddressTranslationFailed)?;
        let hva = self
            .memory
            .hpa2hva(hpa)
            .filter(|hva| !hva.is_null())
            .ok_or(CmdlineError::AddressTranslationFailed)?;
        let region = self
            .memory
            .map_mut(hva, DEV_SEC_INFO_SIZE)
            .map_err(|_| CmdlineError::AddressTranslationFailed)?;

        self.extractor.extract(Some(region));

        // The host-physical address must not reach the guest.
        token.fill(b' ');

        if let Some(out) = out {
            let gpa = vm.hva2gpa(hva);
            log::debug!("Seed block moved from HPA {:#x} to GPA {:#x}", hpa, gpa);
            format_param(out, gpa);
        }

        Ok(())
    }
}

/// Length of the space-delimited token at the start of `s`. The token has
/// to end within `max` bytes, otherwise [`None`] is returned.
fn token_len(s: &[u8], max: usize) -> Option<usize> {
    let bounded = strnlen(s, max);
    if let Some(len) = find_byte(&s[..bounded], b' ') {
        return Some(len);
    }
    match s.get(bounded) {
        None | Some(0) | Some(b' ') => Some(bounded),
        Some(_) => None,
    }
}

/// Convenience wrapper around [`SeedHandoff::rewrite()`] for a single
/// boot: the collaborators are borrowed for the duration of the call.
pub fn rewrite_seed_param(
    memory: &mut impl HostMemory,
    sink: &mut impl SeedSink,
    vm: &dyn GuestAddressSpace,
    cmdline: Option<&mut [u8]>,
    out: Option<&mut [u8]>,
) -> bool {
    SeedHandoff::new(memory, sink, SeedConfig::default()).rewrite(vm, cmdline, out)
}
