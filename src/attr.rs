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

//! Read-only `ztemt_hw_version` status attribute.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::Result;
use crate::logger;
use crate::resolver::Resolver;

pub const ATTR_NAME: &str = "ztemt_hw_version";
pub const ATTR_MODE: u32 = 0o664;
pub const DEFAULT_ATTR_DIR: &str = "/run/hwrev";

/// Attribute content: the display name followed by a newline.
pub fn show(resolver: &Resolver) -> String {
    format!("{}\n", resolver.display_name())
}

/// Write the attribute file into `dir`, creating the directory if needed.
pub fn export(resolver: &Resolver, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(ATTR_NAME);
    let content = show(resolver);
    fs::write(&path, &content)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(ATTR_MODE))?;

    logger::log_event(
        "attr_export",
        json!({
            "path": path.display().to_string(),
            "value": content.trim_end(),
        }),
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BoardFamily;

    #[test]
    fn test_show_appends_newline() {
        let r = Resolver::for_family(BoardFamily::Nx601j, 900);
        assert_eq!(show(&r), "ZTEMT_NX601J_B\n");
    }

    #[test]
    fn test_show_unknown() {
        let r = Resolver::for_family(BoardFamily::Nx601j, 300);
        assert_eq!(show(&r), "unknow\n");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("devices").join("hw");
        let r = Resolver::for_family(BoardFamily::Nx504j, 1120);

        let path = export(&r, &target).unwrap();
        assert_eq!(path, target.join("ztemt_hw_version"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "ZTEMT_NX504J_D\n");

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
    }

    #[test]
    fn test_export_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ATTR_NAME), "ZTEMT_UN_A\n").unwrap();

        let r = Resolver::for_family(BoardFamily::Generic, 5000);
        let path = export(&r, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "unknow\n");
    }
}
