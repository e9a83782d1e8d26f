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

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attr::DEFAULT_ATTR_DIR;
use crate::bootparam::DEFAULT_CMDLINE_PATH;
use crate::error::{HwRevError, Result};
use crate::logger::DEFAULT_LOG_PATH;
use crate::table::BoardFamily;

pub const CONFIG_ENV: &str = "HWREV_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HwRevConfig {
    /// Overrides the family compiled in through Cargo features.
    #[serde(default)]
    pub family: Option<BoardFamily>,
    #[serde(default)]
    pub cmdline_path: Option<PathBuf>,
    #[serde(default)]
    pub attr_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl HwRevConfig {
    pub fn family(&self) -> BoardFamily {
        self.family.unwrap_or_default()
    }

    pub fn cmdline_path(&self) -> PathBuf {
        self.cmdline_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CMDLINE_PATH))
    }

    pub fn attr_dir(&self) -> PathBuf {
        self.attr_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_ATTR_DIR))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(p) = env::var(CONFIG_ENV) {
        if !p.is_empty() {
            return PathBuf::from(p);
        }
    }
    PathBuf::from("/etc/hwrev/config.json")
}

pub fn validate_config(cfg: &HwRevConfig) -> Result<()> {
    let paths = [
        ("cmdline_path", &cfg.cmdline_path),
        ("attr_dir", &cfg.attr_dir),
        ("log_path", &cfg.log_path),
    ];
    for (field, p) in paths {
        if let Some(p) = p {
            if p.as_os_str().is_empty() {
                return Err(HwRevError::config(format!("{} must not be empty", field)));
            }
        }
    }
    Ok(())
}

/// Load and validate the config at `path`. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<HwRevConfig> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HwRevConfig::default()),
        Err(e) => return Err(e.into()),
    };
    let cfg: HwRevConfig = serde_json::from_str(&data)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn load_config() -> Result<HwRevConfig> {
    load_config_from(&config_path())
}
