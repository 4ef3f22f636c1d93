// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 The hvboot Authors

//! Bounded helpers for byte strings handed over by the bootloader. None of
//! them ever looks past the slice it is given, and callers bound the slice
//! to a fixed scan window before handing it in.

use core::fmt;

/// Length of the NUL-terminated string in `s`, looking at no more than
/// `max` bytes.
pub fn strnlen(s: &[u8], max: usize) -> usize {
    let window = &s[..s.len().min(max)];
    window.iter().position(|&b| b == 0).unwrap_or(window.len())
}

/// Offset of the first occurrence of `needle` in `haystack`.
pub fn find_bounded(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Offset of the first occurrence of `byte` in `haystack`.
pub fn find_byte(haystack: &[u8], byte: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == byte)
}

/// Parses a hexadecimal number at the start of `s`, with an optional `0x`
/// or `0X` prefix. Parsing stops at the first byte that is not a hex
/// digit. Returns [`None`] when no digit is present or the value does not
/// fit into 64 bits.
pub fn parse_hex(s: &[u8]) -> Option<u64> {
    let digits = match s {
        [b'0', b'x' | b'X', rest @ ..] => rest,
        _ => s,
    };

    let mut value: u64 = 0;
    let mut count = 0usize;
    for &b in digits {
        let Some(nibble) = (b as char).to_digit(16) else {
            break;
        };
        value = value.checked_mul(16)?.checked_add(u64::from(nibble))?;
        count += 1;
    }

    (count > 0).then_some(value)
}

/// A [`fmt::Write`] sink over a byte slice with `snprintf()` semantics:
/// output that does not fit is dropped and room is always kept for a
/// terminating NUL, which [`SliceWriter::finish()`] appends.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn capacity(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }

    /// Terminates the string and returns the number of text bytes written,
    /// not counting the NUL.
    pub fn finish(self) -> usize {
        if let Some(b) = self.buf.get_mut(self.pos) {
            *b = 0;
        }
        self.pos
    }
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.capacity() - self.pos;
        let len = s.len().min(room);
        self.buf[self.pos..self.pos + len].copy_from_slice(&s.as_bytes()[..len]);
        self.pos += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn strnlen_bounds() {
        assert_eq!(strnlen(b"abc\0def", 16), 3);
        assert_eq!(strnlen(b"abcdef", 4), 4);
        assert_eq!(strnlen(b"abc", 16), 3);
        assert_eq!(strnlen(b"", 16), 0);
    }

    #[test]
    fn find() {
        assert_eq!(find_bounded(b"foo bar=1 baz", b"bar="), Some(4));
        assert_eq!(find_bounded(b"foo ba", b"bar="), None);
        assert_eq!(find_bounded(b"", b"x"), None);
        assert_eq!(find_byte(b"ab cd", b' '), Some(2));
        assert_eq!(find_byte(b"abcd", b' '), None);
    }

    #[test]
    fn hex() {
        assert_eq!(parse_hex(b"0x1000"), Some(0x1000));
        assert_eq!(parse_hex(b"0XdeadBEEF rest"), Some(0xdead_beef));
        assert_eq!(parse_hex(b"1f"), Some(0x1f));
        assert_eq!(parse_hex(b"12g4"), Some(0x12));
        assert_eq!(parse_hex(b"0x"), None);
        assert_eq!(parse_hex(b"zz"), None);
        assert_eq!(parse_hex(b""), None);
        assert_eq!(parse_hex(b"ffffffffffffffff"), Some(u64::MAX));
        assert_eq!(parse_hex(b"10000000000000000"), None);
    }

    #[test]
    fn writer_fits() {
        let mut buf = [0xffu8; 16];
        let mut w = SliceWriter::new(&mut buf);
        write!(w, "a={:#X} ", 0x2000).unwrap();
        assert_eq!(w.finish(), 9);
        assert_eq!(&buf[..10], b"a=0x2000 \0");
    }

    #[test]
    fn writer_truncates() {
        let mut buf = [0xffu8; 5];
        let mut w = SliceWriter::new(&mut buf);
        write!(w, "abcdefgh").unwrap();
        assert_eq!(w.finish(), 4);
        assert_eq!(&buf, b"abcd\0");
    }

    #[test]
    fn writer_empty() {
        let mut buf = [0u8; 0];
        let mut w = SliceWriter::new(&mut buf);
        write!(w, "abc").unwrap();
        assert_eq!(w.finish(), 0);
    }
}
