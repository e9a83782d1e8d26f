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

//! Millivolt range tables for each supported board family.
//!
//! A table maps the voltage sampled on the board ID pin to a revision tag.
//! Entries are scanned in order and the first inclusive range that contains
//! the reading wins, so touching or overlapping ranges must be ordered with
//! the preferred entry first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HwRevError, Result};

/// Symbolic board revision.
///
/// Ids of different families overlap on purpose: each family numbers its
/// revisions from zero in table order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum RevisionTag {
    /// The reading matched no configured range.
    Unknown,
    HwA,
    HwB,
    Nx601jHwA,
    Nx601jHwB,
    Nx504jHwA,
    Nx504jHwB,
    Nx504jHwC,
    Nx504jHwD,
    Nx504jHwE,
    Nx504jHwF,
}

impl RevisionTag {
    /// Integer form handed to platform callers; `Unknown` is -1.
    pub fn id(self) -> i32 {
        match self {
            RevisionTag::Unknown => -1,
            RevisionTag::HwA | RevisionTag::Nx601jHwA | RevisionTag::Nx504jHwA => 0,
            RevisionTag::HwB | RevisionTag::Nx601jHwB | RevisionTag::Nx504jHwB => 1,
            RevisionTag::Nx504jHwC => 2,
            RevisionTag::Nx504jHwD => 3,
            RevisionTag::Nx504jHwE => 4,
            RevisionTag::Nx504jHwF => 5,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == RevisionTag::Unknown
    }
}

/// One inclusive `[low_mv, high_mv]` range of a revision table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RevisionRangeEntry {
    pub low_mv: i32,
    pub high_mv: i32,
    pub revision_tag: RevisionTag,
    pub display_name: &'static str,
}

impl RevisionRangeEntry {
    pub const fn new(low_mv: i32, high_mv: i32, revision_tag: RevisionTag, display_name: &'static str) -> Self {
        Self { low_mv, high_mv, revision_tag, display_name }
    }

    pub fn contains(&self, input_mv: i32) -> bool {
        self.low_mv <= input_mv && input_mv <= self.high_mv
    }
}

/// Ordered, immutable list of range entries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RevisionTable {
    name: &'static str,
    entries: &'static [RevisionRangeEntry],
}

impl RevisionTable {
    pub const fn new(name: &'static str, entries: &'static [RevisionRangeEntry]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [RevisionRangeEntry] {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry carrying `tag`, used to recover the display name of a resolved tag.
    pub fn entry_for(&self, tag: RevisionTag) -> Option<&'static RevisionRangeEntry> {
        if tag.is_unknown() {
            return None;
        }
        self.entries.iter().find(|e| e.revision_tag == tag)
    }

    pub fn for_family(family: BoardFamily) -> &'static RevisionTable {
        match family {
            BoardFamily::Nx601j => &NX601J_TABLE,
            BoardFamily::Nx504j => &NX504J_TABLE,
            BoardFamily::Generic => &GENERIC_TABLE,
        }
    }
}

static NX601J_ENTRIES: [RevisionRangeEntry; 2] = [
    RevisionRangeEntry::new(0, 200, RevisionTag::Nx601jHwA, "ZTEMT_NX601J_A"), // id_mv=0
    RevisionRangeEntry::new(700, 1100, RevisionTag::Nx601jHwB, "ZTEMT_NX601J_B"), // id_mv=900
];

static NX504J_ENTRIES: [RevisionRangeEntry; 6] = [
    RevisionRangeEntry::new(0, 200, RevisionTag::Nx504jHwA, "ZTEMT_NX504J_A"), // id_mv=0
    RevisionRangeEntry::new(200, 550, RevisionTag::Nx504jHwB, "ZTEMT_NX504J_B"), // id_mv=416
    RevisionRangeEntry::new(550, 900, RevisionTag::Nx504jHwC, "ZTEMT_NX504J_C"), // id_mv=720
    RevisionRangeEntry::new(900, 1300, RevisionTag::Nx504jHwD, "ZTEMT_NX504J_D"), // id_mv=1120
    RevisionRangeEntry::new(1300, 1650, RevisionTag::Nx504jHwE, "ZTEMT_NX504J_E"), // id_mv=1475
    RevisionRangeEntry::new(1650, 1900, RevisionTag::Nx504jHwF, "ZTEMT_NX504J_F"), // id_mv=1800
];

static GENERIC_ENTRIES: [RevisionRangeEntry; 2] = [
    RevisionRangeEntry::new(0, 200, RevisionTag::HwA, "ZTEMT_UN_A"), // id_mv=0
    RevisionRangeEntry::new(700, 1100, RevisionTag::HwB, "ZTEMT_UN_B"), // id_mv=900
];

pub static NX601J_TABLE: RevisionTable = RevisionTable::new("nx601j", &NX601J_ENTRIES);
pub static NX504J_TABLE: RevisionTable = RevisionTable::new("nx504j", &NX504J_ENTRIES);
pub static GENERIC_TABLE: RevisionTable = RevisionTable::new("generic", &GENERIC_ENTRIES);

/// Scan `table` for the first range containing `input_mv`.
///
/// An absent or empty table is a configuration error. A reading outside every
/// range is not an error and resolves to [`RevisionTag::Unknown`].
pub fn lookup(table: Option<&RevisionTable>, input_mv: i32) -> Result<RevisionTag> {
    let table = table.ok_or_else(|| HwRevError::invalid_configuration("revision table is absent"))?;
    if table.is_empty() {
        return Err(HwRevError::invalid_configuration(format!(
            "revision table '{}' has no entries",
            table.name()
        )));
    }

    Ok(table
        .entries()
        .iter()
        .find(|e| e.contains(input_mv))
        .map(|e| e.revision_tag)
        .unwrap_or(RevisionTag::Unknown))
}

/// Board family whose table is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardFamily {
    Nx601j,
    Nx504j,
    Generic,
}

impl BoardFamily {
    /// Family compiled in through the `nx601j` / `nx504j` Cargo features.
    pub const fn compiled_default() -> Self {
        if cfg!(feature = "nx601j") {
            BoardFamily::Nx601j
        } else if cfg!(feature = "nx504j") {
            BoardFamily::Nx504j
        } else {
            BoardFamily::Generic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoardFamily::Nx601j => "nx601j",
            BoardFamily::Nx504j => "nx504j",
            BoardFamily::Generic => "generic",
        }
    }

    pub fn table(self) -> &'static RevisionTable {
        RevisionTable::for_family(self)
    }
}

impl Default for BoardFamily {
    fn default() -> Self {
        Self::compiled_default()
    }
}

impl fmt::Display for BoardFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardFamily {
    type Err = HwRevError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nx601j" => Ok(BoardFamily::Nx601j),
            "nx504j" => Ok(BoardFamily::Nx504j),
            "generic" => Ok(BoardFamily::Generic),
            other => Err(HwRevError::invalid_argument(format!("unknown board family '{}'", other))),
        }
    }
}
