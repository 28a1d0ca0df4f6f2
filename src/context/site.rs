//! Source location of a log call.

use std::panic::Location;

/// File and line a record originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub const UNKNOWN_FILE: &'static str = "unknown";

    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of whoever called the `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    /// Sentinel used when no location is available.
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN_FILE, 0)
    }

    /// Build from optional parts, as reported by tracing metadata.
    pub fn from_parts(file: Option<&str>, line: Option<u32>) -> Self {
        match file {
            Some(file) => Self::new(file, line.unwrap_or(0)),
            None => Self::unknown(),
        }
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}
