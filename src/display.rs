/*
 * This file is part of hwrev.
 *
 * Copyright (C) 2025 hwrev contributors
 *
 * hwrev is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * hwrev is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with hwrev. If not, see <https://www.gnu.org/licenses/>.
 */

//! Fixed-capacity output buffer for the revision display string.

use std::fmt;

use crate::resolver;

/// Capacity of a [`DisplayBuffer`] in bytes.
pub const HW_VERSION_BUF_LEN: usize = 64;

/// Literal written when the reading matched no range. Consumers match on this
/// exact spelling.
pub const UNKNOWN_DISPLAY_NAME: &str = "unknow";

/// Bounded UTF-8 buffer that never grows past [`HW_VERSION_BUF_LEN`].
///
/// Writes that do not fit are truncated at a character boundary and report
/// `fmt::Error`; the stored text stays valid either way.
#[derive(Clone)]
pub struct DisplayBuffer {
    bytes: [u8; HW_VERSION_BUF_LEN],
    len: usize,
}

impl DisplayBuffer {
    pub const fn new() -> Self {
        Self { bytes: [0; HW_VERSION_BUF_LEN], len: 0 }
    }

    pub const fn capacity(&self) -> usize {
        HW_VERSION_BUF_LEN
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_str(&self) -> &str {
        // push_str only ever copies whole characters
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// Append `s`, keeping as many whole characters as fit. Returns false if
    /// anything was dropped.
    pub fn push_str(&mut self, s: &str) -> bool {
        let room = HW_VERSION_BUF_LEN - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        take == s.len()
    }

    /// Replace the contents with `s`.
    pub fn set(&mut self, s: &str) -> bool {
        self.clear();
        self.push_str(s)
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for DisplayBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.push_str(s) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

impl fmt::Debug for DisplayBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayBuffer").field(&self.as_str()).finish()
    }
}

impl fmt::Display for DisplayBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write the process-wide board revision name into `buffer`.
///
/// `None` stands for a missing output buffer and is ignored.
pub fn get_hardware_revision_string(buffer: Option<&mut DisplayBuffer>) {
    resolver::global().render_display_name(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = DisplayBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.as_str(), "");
        assert_eq!(buf.capacity(), HW_VERSION_BUF_LEN);
    }

    #[test]
    fn test_set_replaces_contents() {
        let mut buf = DisplayBuffer::new();
        assert!(buf.set("ZTEMT_NX601J_A"));
        assert!(buf.set(UNKNOWN_DISPLAY_NAME));
        assert_eq!(buf.as_str(), "unknow");
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_write_macro() {
        let mut buf = DisplayBuffer::new();
        write!(buf, "{}_{}", "ZTEMT", 42).unwrap();
        assert_eq!(buf.to_string(), "ZTEMT_42");
    }

    #[test]
    fn test_overflow_truncates() {
        let mut buf = DisplayBuffer::new();
        let long = "x".repeat(HW_VERSION_BUF_LEN + 10);
        assert!(!buf.push_str(&long));
        assert_eq!(buf.len(), HW_VERSION_BUF_LEN);
        assert!(write!(buf, "y").is_err());
        assert_eq!(buf.len(), HW_VERSION_BUF_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let mut buf = DisplayBuffer::new();
        buf.push_str(&"a".repeat(HW_VERSION_BUF_LEN - 1));
        // two-byte character cannot fit in the last byte
        assert!(!buf.push_str("é"));
        assert_eq!(buf.len(), HW_VERSION_BUF_LEN - 1);
        assert!(buf.as_str().chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_debug_shows_text() {
        let mut buf = DisplayBuffer::new();
        buf.set("ZTEMT_UN_B");
        assert_eq!(format!("{:?}", buf), "DisplayBuffer(\"ZTEMT_UN_B\")");
    }
}
