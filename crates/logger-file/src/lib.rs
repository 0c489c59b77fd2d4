//! Rotating flat-file logger with optional buffered draining
//!
//! This crate provides a process-local logger that:
//! - Renders syslog-style records as `<ident>|<y>-<m>-<d> <h>:<m>:<s>|<SEVERITY>|<message>`
//! - Rotates segment files by calendar day and by size
//! - Writes synchronously, or queues records and drains them in coalesced writes
//! - Never fails the caller: internal errors go to an injectable hook
//!
//! ```rust,no_run
//! use proven_logger_file::{FileLogger, info, warning};
//!
//! let logger = FileLogger::new("gateway", "/var/log/gateway")?;
//! logger.set_max_segment_bytes(Some(16 * 1024 * 1024));
//!
//! info!(logger, "listening on {}\n", 8080);
//!
//! logger.set_buffered(true);
//! warning!(logger, "queue depth {}\n", 512);
//! logger.flush();
//! # Ok::<(), proven_logger_file::Error>(())
//! ```

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod clock;
mod config;
mod error;
mod record;
mod segment;
mod severity;
mod writer;

mod macros;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{FileLoggerConfig, FileLoggerConfigBuilder};
pub use error::{Error, Result};
pub use record::Record;
pub use segment::{probe_segment, segment_path};
pub use severity::Severity;
pub use writer::{ErrorHook, FileLogger, IDENT_CAPACITY};
