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

//! Source of the ID pin reading: the `board_type=<mv>` kernel parameter.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::Result;
use crate::logger;

/// Kernel command line parameter carrying the ID pin reading.
pub const BOARD_TYPE_PARAM: &str = "board_type";

/// Reading assumed when the bootloader does not pass one.
pub const DEFAULT_ID_MV: i32 = 900;

pub const DEFAULT_CMDLINE_PATH: &str = "/proc/cmdline";

/// Anything able to hand over the millivolt reading once.
#[cfg_attr(test, mockall::automock)]
pub trait MillivoltSource {
    fn read_mv(&self) -> Result<i32>;
}

/// Reads `board_type` from a kernel command line file.
#[derive(Debug, Clone)]
pub struct CmdlineSource {
    path: PathBuf,
}

impl CmdlineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for CmdlineSource {
    fn default() -> Self {
        Self::new(DEFAULT_CMDLINE_PATH)
    }
}

impl MillivoltSource for CmdlineSource {
    fn read_mv(&self) -> Result<i32> {
        let cmdline = fs::read_to_string(&self.path)?;
        Ok(parse_board_type(&cmdline).unwrap_or(DEFAULT_ID_MV))
    }
}

/// Fixed reading, e.g. from a command line override.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedSource(pub i32);

impl MillivoltSource for FixedSource {
    fn read_mv(&self) -> Result<i32> {
        Ok(self.0)
    }
}

/// Read from `source`, falling back to [`DEFAULT_ID_MV`] if it fails.
pub fn millivolts_or_default(source: &dyn MillivoltSource) -> i32 {
    match source.read_mv() {
        Ok(mv) => mv,
        Err(e) => {
            logger::log_event(
                "bootparam_fallback",
                json!({ "error": e.to_string(), "mv": DEFAULT_ID_MV }),
            );
            DEFAULT_ID_MV
        }
    }
}

/// Value of the last `board_type` parameter on `cmdline`, if any.
///
/// Later occurrences override earlier ones. A bare `board_type` or one whose
/// value has no leading digits reads as 0.
pub fn parse_board_type(cmdline: &str) -> Option<i32> {
    cmdline
        .split_whitespace()
        .filter_map(|tok| match tok.split_once('=') {
            Some((key, val)) if key == BOARD_TYPE_PARAM => Some(val),
            None if tok == BOARD_TYPE_PARAM => Some(""),
            _ => None,
        })
        .last()
        .map(parse_int_option)
}

/// Integer parsing with kernel `get_option` rules: a leading `-`, then a
/// `0x` (hex) or `0` (octal) prefix or plain decimal, stopping at the first
/// character that is not a digit of that base. Overflow wraps.
pub fn parse_int_option(s: &str) -> i32 {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (radix, digits) = if let Some(rest) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .filter(|r| r.chars().next().is_some_and(|c| c.is_ascii_hexdigit()))
    {
        (16, rest)
    } else if digits.starts_with('0') {
        (8, digits)
    } else {
        (10, digits)
    };

    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0u64, |acc, d| acc.wrapping_mul(radix as u64).wrapping_add(d as u64));

    let value = magnitude as i32;
    if neg {
        value.wrapping_neg()
    } else {
        value
    }
}
