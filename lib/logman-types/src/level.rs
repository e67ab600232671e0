/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("unknown level name {0}")]
    UnknownName(String),
    #[error("level code {0} out of range")]
    CodeOutOfRange(i64),
}

/// Log severity.
///
/// A larger value is more verbose. `Unset` is only a placeholder meaning
/// "inherit from the owner" and must be replaced before filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    #[default]
    Unset = 0,
    Critical = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
}

impl Level {
    pub const ACTIVE: [Level; 5] = [
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Debug,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Result<Self, LevelParseError> {
        match code {
            0 => Ok(Level::Unset),
            1 => Ok(Level::Critical),
            2 => Ok(Level::Error),
            3 => Ok(Level::Warning),
            4 => Ok(Level::Info),
            5 => Ok(Level::Debug),
            _ => Err(LevelParseError::CodeOutOfRange(code)),
        }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        Level::Critical <= self && self <= Level::Debug
    }

    /// Whether a logger configured at `self` lets a call at `call` through.
    #[inline]
    pub fn accepts(self, call: Level) -> bool {
        call <= self
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Unset => "unset",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    pub fn to_slog(self) -> Option<slog::Level> {
        match self {
            Level::Unset => None,
            Level::Critical => Some(slog::Level::Critical),
            Level::Error => Some(slog::Level::Error),
            Level::Warning => Some(slog::Level::Warning),
            Level::Info => Some(slog::Level::Info),
            Level::Debug => Some(slog::Level::Debug),
        }
    }

    /// slog trace records are folded into debug.
    pub fn from_slog(level: slog::Level) -> Self {
        match level {
            slog::Level::Critical => Level::Critical,
            slog::Level::Error => Level::Error,
            slog::Level::Warning => Level::Warning,
            slog::Level::Info => Level::Info,
            slog::Level::Debug | slog::Level::Trace => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = i64::from_str(s) {
            return Level::from_code(code);
        }
        match s.to_lowercase().as_str() {
            "unset" | "notset" => Ok(Level::Unset),
            "critical" | "crit" => Ok(Level::Critical),
            "error" | "err" => Ok(Level::Error),
            "warning" | "warn" => Ok(Level::Warning),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(LevelParseError::UnknownName(s.to_string())),
        }
    }
}
