//! The file logger: synchronous writes, buffered draining, lifecycle

use crate::clock::{Clock, SystemClock};
use crate::config::FileLoggerConfig;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::segment::SegmentWriter;
use crate::severity::Severity;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::warn;

/// Maximum length in bytes of the ident embedded in record headers
pub const IDENT_CAPACITY: usize = 63;

/// Callback receiving internal failures (rotation, writes)
///
/// Runs after the segment lock is released, once per failure, in the order
/// the failures occurred.
pub type ErrorHook = Arc<dyn Fn(&Error) + Send + Sync>;

const UNBOUNDED: u64 = u64::MAX;

fn truncate_ident(mut ident: String) -> String {
    if ident.len() > IDENT_CAPACITY {
        let mut end = IDENT_CAPACITY;
        while !ident.is_char_boundary(end) {
            end -= 1;
        }
        ident.truncate(end);
    }
    ident
}

fn default_error_hook() -> ErrorHook {
    Arc::new(|e: &Error| warn!("File logger error: {e}"))
}

macro_rules! severity_methods {
    ($($name:ident => $severity:ident),* $(,)?) => {
        $(
            #[doc = concat!("Log a record at [`Severity::", stringify!($severity), "`]")]
            #[inline]
            pub fn $name(&self, args: fmt::Arguments<'_>) {
                self.log(Severity::$severity, args);
            }
        )*
    };
}

/// Rotating flat-file logger
///
/// Records are written to `<prefix>.<year>-<month>-<day>.<sequence>.txt`.
/// A new segment starts when the day of year changes or when the next record
/// would reach the configured size threshold.
///
/// Logging never fails the caller: records that cannot be built are dropped,
/// and rotation or write failures go to the [`ErrorHook`].
///
/// # Durability
///
/// In buffered mode records stay in memory until [`flush`](Self::flush).
/// Dropping the logger or calling [`close`](Self::close) **discards** queued
/// records; flush first if they must reach disk.
pub struct FileLogger {
    ident: String,
    clock: Arc<dyn Clock>,
    error_hook: ErrorHook,
    max_segment_bytes: AtomicU64,
    console_echo: AtomicBool,
    file_output: AtomicBool,
    buffered: AtomicBool,
    /// Held for every rotation and file write, by both the synchronous path
    /// and a whole drain, so the two never interleave.
    segments: Mutex<SegmentWriter>,
    /// Only held to push or to detach; never across I/O.
    pending: Mutex<VecDeque<Record>>,
}

impl FileLogger {
    /// Create a logger with default settings: unbounded segments, file output
    /// on, console echo off, buffered mode off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `path_prefix` is empty. Segment
    /// names are built by appending to the prefix, so an empty one would
    /// scatter segments into the working directory as hidden files.
    pub fn new(ident: impl Into<String>, path_prefix: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(FileLoggerConfig {
            ident: ident.into(),
            path_prefix: path_prefix.into(),
            ..FileLoggerConfig::default()
        })
    }

    /// Create a logger from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `config.path_prefix` is empty.
    pub fn with_config(config: FileLoggerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ident: truncate_ident(config.ident),
            clock: Arc::new(SystemClock),
            error_hook: default_error_hook(),
            max_segment_bytes: AtomicU64::new(config.max_segment_bytes.unwrap_or(UNBOUNDED)),
            console_echo: AtomicBool::new(config.console_echo),
            file_output: AtomicBool::new(config.file_output),
            buffered: AtomicBool::new(config.buffered),
            segments: Mutex::new(SegmentWriter::new(config.path_prefix)),
            pending: Mutex::new(VecDeque::new()),
        })
    }

    /// Replace the clock used to timestamp records
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the handler for internal failures
    pub fn with_error_hook(mut self, hook: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.error_hook = Arc::new(hook);
        self
    }

    /// Header label, after truncation
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Set the segment size threshold, `None` for unbounded
    pub fn set_max_segment_bytes(&self, max_segment_bytes: Option<u64>) {
        self.max_segment_bytes
            .store(max_segment_bytes.unwrap_or(UNBOUNDED), Ordering::Relaxed);
    }

    /// Segment size threshold, `None` when unbounded
    pub fn max_segment_bytes(&self) -> Option<u64> {
        match self.max_segment_bytes.load(Ordering::Relaxed) {
            UNBOUNDED => None,
            max => Some(max),
        }
    }

    /// Enable or disable stderr echo
    pub fn set_console_echo(&self, enabled: bool) {
        self.console_echo.store(enabled, Ordering::Relaxed);
    }

    /// Whether records are echoed to stderr
    pub fn console_echo(&self) -> bool {
        self.console_echo.load(Ordering::Relaxed)
    }

    /// Enable or disable segment files
    pub fn set_file_output(&self, enabled: bool) {
        self.file_output.store(enabled, Ordering::Relaxed);
    }

    /// Whether records are persisted
    pub fn file_output(&self) -> bool {
        self.file_output.load(Ordering::Relaxed)
    }

    /// Enable or disable buffered mode. Already queued records stay queued.
    pub fn set_buffered(&self, enabled: bool) {
        self.buffered.store(enabled, Ordering::Relaxed);
    }

    /// Whether records are queued for [`flush`](Self::flush)
    pub fn buffered(&self) -> bool {
        self.buffered.load(Ordering::Relaxed)
    }

    /// Build and emit a record
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let Some(timestamp) = self.clock.now() else {
            return;
        };
        let Some(record) = Record::build(&self.ident, severity, timestamp, args) else {
            return;
        };

        if self.console_echo() {
            let _ = io::stderr().write_all(record.as_bytes());
        }

        if !self.file_output() {
            return;
        }

        if self.buffered() {
            self.pending.lock().push_back(record);
        } else {
            self.write_sync(&record);
        }
    }

    severity_methods! {
        emerg => Emerg,
        alert => Alert,
        crit => Crit,
        err => Err,
        warning => Warning,
        notice => Notice,
        info => Info,
        debug => Debug,
    }

    fn max_threshold(&self) -> u64 {
        self.max_segment_bytes.load(Ordering::Relaxed)
    }

    /// Hand failures to the hook. Callers release the segment lock first, so
    /// the hook may use this logger.
    fn report(&self, errors: Vec<Error>) {
        for e in &errors {
            (self.error_hook)(e);
        }
    }

    fn write_sync(&self, record: &Record) {
        let max = self.max_threshold();
        let timestamp = record.timestamp();
        let len = record.len() as u64;
        let mut errors = Vec::new();

        {
            let mut segments = self.segments.lock();

            if segments.needs_day_rotation(timestamp) {
                segments.begin_day(timestamp);
                errors.extend(segments.rotate(timestamp, max).err());
            } else if segments.needs_size_rotation(len, max) {
                errors.extend(segments.rotate(timestamp, max).err());
            }

            // Counted even if nothing is open
            errors.extend(segments.write(record.as_bytes()).err());
            segments.account(len);
        }

        self.report(errors);
    }

    /// Write every queued record, coalescing consecutive records bound for
    /// the same segment into a single write.
    ///
    /// A no-op when nothing is queued.
    pub fn flush(&self) {
        let mut errors = Vec::new();

        {
            let mut segments = self.segments.lock();
            let batch = mem::take(&mut *self.pending.lock());
            if batch.is_empty() {
                return;
            }

            let max = self.max_threshold();
            let mut buffer = Vec::new();

            for record in batch {
                let timestamp = record.timestamp();
                let len = record.len() as u64;
                let day_change = segments.needs_day_rotation(timestamp);

                if day_change || segments.needs_size_rotation(len, max) {
                    if !buffer.is_empty() {
                        errors.extend(segments.write(&buffer).err());
                        buffer.clear();
                    }
                    if day_change {
                        segments.begin_day(timestamp);
                    }
                    errors.extend(segments.rotate(timestamp, max).err());
                }

                buffer.extend_from_slice(record.as_bytes());
                segments.account(len);
            }

            if !buffer.is_empty() {
                errors.extend(segments.write(&buffer).err());
            }
        }

        self.report(errors);
    }

    /// Discard queued records without writing them, returning how many were
    /// dropped
    pub fn clear(&self) -> usize {
        let discarded = mem::take(&mut *self.pending.lock());
        discarded.len()
    }

    /// Number of queued records
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Path of the open segment, if any
    pub fn current_segment_path(&self) -> Option<PathBuf> {
        self.segments.lock().current_path().map(Path::to_path_buf)
    }

    /// Bytes accounted to the open segment
    pub fn current_segment_bytes(&self) -> u64 {
        self.segments.lock().segment_bytes()
    }

    /// Discard queued records and close the open segment.
    ///
    /// Queued records are **not** written; call [`flush`](Self::flush) first
    /// to keep them. Dropping the logger has the same effect.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        let discarded = self.pending.get_mut().len();
        if discarded > 0 {
            warn!("File logger closed with {discarded} unflushed records discarded");
        }
        self.pending.get_mut().clear();
        self.segments.get_mut().close();
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("ident", &self.ident)
            .field("max_segment_bytes", &self.max_segment_bytes())
            .field("console_echo", &self.console_echo())
            .field("file_output", &self.file_output())
            .field("buffered", &self.buffered())
            .finish_non_exhaustive()
    }
}
