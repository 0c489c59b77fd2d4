//! Syslog-style severity tags

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// System is unusable
    Emerg,
    /// Action must be taken immediately
    Alert,
    /// Critical conditions
    Crit,
    /// Error conditions
    Err,
    /// Warning conditions
    Warning,
    /// Normal but significant condition
    Notice,
    /// Informational messages
    Info,
    /// Debug-level messages
    Debug,
}

impl Severity {
    /// Every severity, most severe first
    pub const ALL: [Severity; 8] = [
        Severity::Emerg,
        Severity::Alert,
        Severity::Crit,
        Severity::Err,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// The tag written into each record header
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Emerg => "EMERG",
            Severity::Alert => "ALERT",
            Severity::Crit => "CRIT",
            Severity::Err => "ERR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Configuration(format!("unknown severity tag '{s}'")))
    }
}
