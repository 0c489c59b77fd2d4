//! Segment naming and rotation

use crate::clock::Timestamp;
use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Generate a segment path, e.g. `logs/app.2024-3-5.0.txt`
pub fn segment_path(prefix: &Path, timestamp: &Timestamp, sequence: u64) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!(
        ".{}-{}-{}.{sequence}.txt",
        timestamp.year, timestamp.month, timestamp.day
    ));
    PathBuf::from(name)
}

/// Size of an existing segment, `None` if it does not exist
pub fn probe_segment(path: &Path) -> Result<Option<u64>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.len())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// The open segment and the counters that decide when to leave it
#[derive(Debug)]
pub(crate) struct SegmentWriter {
    prefix: PathBuf,
    file: Option<File>,
    path: Option<PathBuf>,
    /// Bytes accounted to the open segment, starting from its on-disk size
    segment_bytes: u64,
    /// Day of year of the last day rotation, `None` before the first record
    day_marker: Option<u32>,
    /// First sequence number the next rotation will probe
    next_sequence: u64,
}

impl SegmentWriter {
    pub(crate) fn new(prefix: PathBuf) -> Self {
        Self {
            prefix,
            file: None,
            path: None,
            segment_bytes: 0,
            day_marker: None,
            next_sequence: 0,
        }
    }

    pub(crate) fn needs_day_rotation(&self, timestamp: &Timestamp) -> bool {
        self.day_marker != Some(timestamp.day_of_year)
    }

    /// Record a day change; sequence numbers restart at zero
    pub(crate) fn begin_day(&mut self, timestamp: &Timestamp) {
        self.day_marker = Some(timestamp.day_of_year);
        self.next_sequence = 0;
    }

    pub(crate) fn needs_size_rotation(&self, len: u64, max_segment_bytes: u64) -> bool {
        self.segment_bytes.saturating_add(len) >= max_segment_bytes
    }

    /// Switch to the first segment of `timestamp`'s day, starting at the
    /// current sequence, that is either absent or below `max_segment_bytes`.
    ///
    /// On any error the previous segment stays open and no counter changes.
    pub(crate) fn rotate(&mut self, timestamp: &Timestamp, max_segment_bytes: u64) -> Result<()> {
        let mut sequence = self.next_sequence;
        let (path, size) = loop {
            let path = segment_path(&self.prefix, timestamp, sequence);
            match probe_segment(&path)? {
                Some(size) if size >= max_segment_bytes => sequence += 1,
                Some(size) => break (path, size),
                None => break (path, 0),
            }
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Rotated log segment: {} -> {} ({} bytes)",
            self.path
                .as_deref()
                .map_or_else(|| "<none>".into(), |p| p.display().to_string()),
            path.display(),
            size
        );

        // Old file is dropped (closed) here
        self.file = Some(file);
        self.path = Some(path);
        self.next_sequence = sequence + 1;
        self.segment_bytes = size;
        Ok(())
    }

    /// Write to the open segment; a no-op when none is open
    pub(crate) fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let (Some(file), Some(path)) = (self.file.as_mut(), self.path.as_ref()) else {
            return Ok(());
        };
        file.write_all(bytes).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })
    }

    pub(crate) fn account(&mut self, len: u64) {
        self.segment_bytes = self.segment_bytes.saturating_add(len);
    }

    pub(crate) fn close(&mut self) {
        if let Some(path) = self.path.take() {
            debug!("Closing log segment {}", path.display());
        }
        self.file = None;
    }

    pub(crate) fn current_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn segment_bytes(&self) -> u64 {
        self.segment_bytes
    }
}
