//! Log level definitions
//!
//! TRACE and FATAL sit outside the DEBUG..ERROR range at a fixed distance of
//! four ranks, leaving room for intermediate levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance of the extension levels from the standard bounds
pub const LEVEL_EXTENSION_OFFSET: i8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(i8)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace = -8,
    Debug = -4,
    #[default]
    Info = 0,
    Warn = 4,
    Error = 8,
    Fatal = 12,
}

impl LogLevel {
    /// Integer rank; ordering of levels equals ordering of ranks
    #[inline]
    pub const fn rank(self) -> i8 {
        self as i8
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Fatal => "FATAL",
            standard => standard.standard_name(),
        }
    }

    fn standard_name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            _ => "ERROR",
        }
    }

    /// Parse a configured level, falling back to `Info` for unknown text
    pub fn from_config(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
