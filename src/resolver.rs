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

//! Board revision resolver with one-shot memoization.
//!
//! The ID pin voltage is sampled once at boot, so the first resolution is
//! final: later calls return the cached tag whatever millivolt value they pass.

use std::sync::OnceLock;

use serde_json::json;

use crate::bootparam::DEFAULT_ID_MV;
use crate::display::{DisplayBuffer, UNKNOWN_DISPLAY_NAME};
use crate::logger;
use crate::table::{self, BoardFamily, RevisionTable, RevisionTag};

#[derive(Debug)]
pub struct Resolver {
    table: Option<&'static RevisionTable>,
    input_mv: i32,
    cache: OnceLock<RevisionTag>,
}

impl Resolver {
    /// Resolver over `table` that will resolve `input_mv` on first query.
    pub fn new(table: Option<&'static RevisionTable>, input_mv: i32) -> Self {
        Self { table, input_mv, cache: OnceLock::new() }
    }

    pub fn for_family(family: BoardFamily, input_mv: i32) -> Self {
        Self::new(Some(family.table()), input_mv)
    }

    pub fn table(&self) -> Option<&'static RevisionTable> {
        self.table
    }

    /// Millivolt reading supplied at construction.
    pub fn input_mv(&self) -> i32 {
        self.input_mv
    }

    /// Cached tag, or `None` while still unresolved.
    pub fn cached(&self) -> Option<RevisionTag> {
        self.cache.get().copied()
    }

    /// Resolve `input_mv` against the table on the first call; afterwards
    /// return the cached tag without rescanning.
    ///
    /// Table errors never reach the caller: they are logged and the reading
    /// resolves to `Unknown`.
    pub fn resolve_revision(&self, input_mv: i32) -> RevisionTag {
        *self.cache.get_or_init(|| {
            let tag = match table::lookup(self.table, input_mv) {
                Ok(tag) => tag,
                Err(e) => {
                    logger::log_event(
                        "lookup_failed",
                        json!({ "mv": input_mv, "error": e.to_string() }),
                    );
                    RevisionTag::Unknown
                }
            };
            logger::log_event(
                "hw_id_resolved",
                json!({
                    "mv": input_mv,
                    "id": tag.id(),
                    "name": self.display_name_of(tag),
                }),
            );
            tag
        })
    }

    /// Resolved tag for the stored reading.
    pub fn get_hardware_revision_id(&self) -> RevisionTag {
        self.resolve_revision(self.input_mv)
    }

    /// Write the display name of the resolved revision into `out`, or
    /// `"unknow"` if no range matched. A missing buffer is ignored.
    pub fn render_display_name(&self, out: Option<&mut DisplayBuffer>) {
        let Some(out) = out else { return };
        let tag = self.get_hardware_revision_id();
        out.set(self.display_name_of(tag));
    }

    /// Owned copy of the rendered display name.
    pub fn display_name(&self) -> String {
        let mut buf = DisplayBuffer::new();
        self.render_display_name(Some(&mut buf));
        buf.as_str().to_string()
    }

    fn display_name_of(&self, tag: RevisionTag) -> &'static str {
        self.table
            .and_then(|t| t.entry_for(tag))
            .map(|e| e.display_name)
            .unwrap_or(UNKNOWN_DISPLAY_NAME)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::for_family(BoardFamily::default(), DEFAULT_ID_MV)
    }
}

static GLOBAL: OnceLock<Resolver> = OnceLock::new();

/// Install the process-wide resolver. Fails, handing the resolver back, if one
/// is already in place (either installed or created by an earlier query).
pub fn install(resolver: Resolver) -> Result<(), Resolver> {
    GLOBAL.set(resolver)
}

/// Process-wide resolver; falls back to the compiled-in family and the
/// default reading if nothing was installed before the first query.
pub fn global() -> &'static Resolver {
    GLOBAL.get_or_init(Resolver::default)
}

/// Resolved tag of the process-wide resolver.
pub fn get_hardware_revision_id() -> RevisionTag {
    global().get_hardware_revision_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RevisionRangeEntry;
    use std::sync::Arc;
    use std::thread;

    const EXAMPLE_ENTRIES: [RevisionRangeEntry; 2] = [
        RevisionRangeEntry::new(0, 200, RevisionTag::HwA, "ZTEMT_UN_A"),
        RevisionRangeEntry::new(700, 1100, RevisionTag::HwB, "ZTEMT_UN_B"),
    ];
    static EXAMPLE: RevisionTable = RevisionTable::new("example", &EXAMPLE_ENTRIES);

    static EMPTY: RevisionTable = RevisionTable::new("empty", &[]);

    #[test]
    fn test_starts_unresolved() {
        let r = Resolver::new(Some(&EXAMPLE), 900);
        assert_eq!(r.cached(), None);
        assert_eq!(r.input_mv(), 900);
    }

    #[test]
    fn test_resolves_and_caches() {
        let r = Resolver::new(Some(&EXAMPLE), 900);
        assert_eq!(r.get_hardware_revision_id(), RevisionTag::HwB);
        assert_eq!(r.cached(), Some(RevisionTag::HwB));
    }

    #[test]
    fn test_first_input_sticks() {
        let r = Resolver::new(Some(&EXAMPLE), 0);
        assert_eq!(r.resolve_revision(100), RevisionTag::HwA);
        assert_eq!(r.resolve_revision(900), RevisionTag::HwA);
        assert_eq!(r.resolve_revision(-40), RevisionTag::HwA);
        assert_eq!(r.get_hardware_revision_id(), RevisionTag::HwA);
    }

    #[test]
    fn test_unknown_result_is_cached_too() {
        let r = Resolver::new(Some(&EXAMPLE), 300);
        assert_eq!(r.get_hardware_revision_id(), RevisionTag::Unknown);
        assert_eq!(r.resolve_revision(900), RevisionTag::Unknown);
        assert_eq!(r.cached(), Some(RevisionTag::Unknown));
    }

    #[test]
    fn test_missing_table_resolves_unknown() {
        let r = Resolver::new(None, 900);
        assert_eq!(r.get_hardware_revision_id(), RevisionTag::Unknown);
        assert_eq!(r.display_name(), "unknow");

        let r = Resolver::new(Some(&EMPTY), 900);
        assert_eq!(r.get_hardware_revision_id(), RevisionTag::Unknown);
    }

    #[test]
    fn test_render_display_name() {
        let r = Resolver::new(Some(&EXAMPLE), 900);
        let mut buf = DisplayBuffer::new();
        buf.set("stale contents");
        r.render_display_name(Some(&mut buf));
        assert_eq!(buf.as_str(), "ZTEMT_UN_B");
    }

    #[test]
    fn test_render_unknown_literal() {
        let r = Resolver::new(Some(&EXAMPLE), 300);
        let mut buf = DisplayBuffer::new();
        r.render_display_name(Some(&mut buf));
        assert_eq!(buf.as_str(), "unknow");
    }

    #[test]
    fn test_render_without_buffer_is_noop() {
        let r = Resolver::new(Some(&EXAMPLE), 900);
        r.render_display_name(None);
        // nothing rendered, nothing resolved
        assert_eq!(r.cached(), None);
    }

    #[test]
    fn test_concurrent_first_queries_converge() {
        let r = Arc::new(Resolver::for_family(BoardFamily::Nx504j, 720));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let r = Arc::clone(&r);
                thread::spawn(move || r.resolve_revision(if i % 2 == 0 { 720 } else { 1800 }))
            })
            .collect();
        let results: Vec<RevisionTag> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first = r.cached().unwrap();
        assert!(results.iter().all(|t| *t == first));
    }

    #[test]
    fn test_default_uses_900_mv() {
        let r = Resolver::default();
        assert_eq!(r.input_mv(), 900);
        assert_eq!(r.table().unwrap().name(), BoardFamily::default().as_str());
    }
}
