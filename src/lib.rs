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

//! hwrev - board hardware revision from the ID pin reading
//!
//! Maps the millivolt value sampled on the board identification pin to a
//! revision tag through a per-family range table, caches the result for the
//! life of the process and exposes it as an id, a display name and a status
//! attribute.

pub mod error;
pub mod table;
pub mod resolver;
pub mod display;
pub mod bootparam;
pub mod attr;
pub mod config;
pub mod logger;

pub use display::{get_hardware_revision_string, DisplayBuffer};
pub use error::{HwRevError, Result};
pub use resolver::{get_hardware_revision_id, Resolver};
pub use table::{BoardFamily, RevisionRangeEntry, RevisionTable, RevisionTag};
