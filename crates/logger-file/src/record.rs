//! Immutable, pre-rendered log records

use crate::clock::Timestamp;
use crate::severity::Severity;
use std::fmt::{self, Write};

/// A fully rendered record: `<ident>|<timestamp>|<SEVERITY>|<message>`
///
/// No newline is appended; callers include one in the message when they want
/// line-oriented files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    timestamp: Timestamp,
    text: String,
}

/// `fmt::Write` sink that only counts bytes
#[derive(Default)]
struct LengthCounter(usize);

impl Write for LengthCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

fn write_header<W: Write>(
    out: &mut W,
    ident: &str,
    severity: Severity,
    timestamp: &Timestamp,
) -> fmt::Result {
    write!(out, "{ident}|{timestamp}|{severity}|")
}

impl Record {
    /// Render a record, or return `None` if anything goes wrong.
    ///
    /// The header and message are measured first and the buffer is allocated
    /// at exactly that size. An empty message, a formatting error, a failed
    /// allocation, or a message whose rendering does not match its measured
    /// length all yield `None`.
    pub fn build(
        ident: &str,
        severity: Severity,
        timestamp: Timestamp,
        args: fmt::Arguments<'_>,
    ) -> Option<Self> {
        let mut body = LengthCounter::default();
        body.write_fmt(args).ok()?;
        if body.0 == 0 {
            return None;
        }

        let mut header = LengthCounter::default();
        write_header(&mut header, ident, severity, &timestamp).ok()?;
        let len = header.0.checked_add(body.0)?;

        let mut text = String::new();
        text.try_reserve_exact(len).ok()?;
        write_header(&mut text, ident, severity, &timestamp).ok()?;
        text.write_fmt(args).ok()?;
        if text.len() != len {
            return None;
        }

        Some(Self { timestamp, text })
    }

    /// Time the record was built
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false for a built record; provided for API completeness
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Raw bytes as written to disk
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Rendered text
    pub fn as_str(&self) -> &str {
        &self.text
    }
}
