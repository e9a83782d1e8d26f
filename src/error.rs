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

//! Error type shared by the revision tables and their collaborators.

use std::io;

/// Result type alias using HwRevError
pub type Result<T> = std::result::Result<T, HwRevError>;

#[derive(thiserror::Error, Debug)]
pub enum HwRevError {
    // ============================================================================
    // Table Errors
    // ============================================================================
    #[error("Invalid revision table configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ============================================================================
    // Collaborator Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HwRevError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HwRevError::invalid_configuration("table is absent");
        assert_eq!(err.to_string(), "Invalid revision table configuration: table is absent");

        let err = HwRevError::invalid_argument("unknown family 'nx999'");
        assert_eq!(err.to_string(), "Invalid argument: unknown family 'nx999'");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no cmdline");
        let err: HwRevError = io_err.into();
        assert!(matches!(err, HwRevError::Io(_)));
        assert!(err.to_string().contains("no cmdline"));
    }
}
