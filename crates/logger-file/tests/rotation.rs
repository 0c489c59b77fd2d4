//! Day and size rotation through the synchronous path

use chrono::{TimeZone, Utc};
use proven_logger_file::{Clock, Error, FileLogger, ManualClock, Timestamp, info, segment_path};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    prefix: PathBuf,
    clock: ManualClock,
    logger: FileLogger,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("node");
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let logger = FileLogger::new("n1", &prefix)
            .unwrap()
            .with_clock(clock.clone());
        Self {
            _dir: dir,
            prefix,
            clock,
            logger,
        }
    }

    fn now(&self) -> Timestamp {
        self.clock.now().unwrap()
    }

    fn segment(&self, timestamp: &Timestamp, sequence: u64) -> PathBuf {
        segment_path(&self.prefix, timestamp, sequence)
    }

    /// A message body that makes the whole record exactly `len` bytes
    fn body_for(&self, len: usize) -> String {
        let header = format!("n1|{}|INFO|", self.now());
        "x".repeat(len - header.len())
    }
}

#[test]
fn test_writes_below_threshold_stay_in_segment_zero() {
    let fx = Fixture::new();
    fx.logger.set_max_segment_bytes(Some(10_000));

    let mut expected = 0;
    for i in 0..20 {
        let before = fx.logger.current_segment_bytes();
        info!(fx.logger, "message {i}\n");
        expected += fx.logger.current_segment_bytes() - before;
    }

    let ts = fx.now();
    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&ts, 0)));
    assert!(!fx.segment(&ts, 1).exists());
    assert_eq!(fx.logger.current_segment_bytes(), expected);
    assert_eq!(fs::metadata(fx.segment(&ts, 0)).unwrap().len(), expected);
}

#[test]
fn test_size_rotation_before_overflowing_record() {
    let fx = Fixture::new();
    fx.logger.set_max_segment_bytes(Some(100));
    let body = fx.body_for(40);

    info!(fx.logger, "{body}");
    info!(fx.logger, "{body}");
    assert_eq!(fx.logger.current_segment_bytes(), 80);

    info!(fx.logger, "{body}");

    let ts = fx.now();
    assert_eq!(fs::metadata(fx.segment(&ts, 0)).unwrap().len(), 80);
    assert_eq!(fs::metadata(fx.segment(&ts, 1)).unwrap().len(), 40);
    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&ts, 1)));
    assert_eq!(fx.logger.current_segment_bytes(), 40);
}

#[test]
fn test_day_change_resets_sequence() {
    let fx = Fixture::new();
    fx.logger.set_max_segment_bytes(Some(100));
    let body = fx.body_for(60);

    info!(fx.logger, "{body}");
    info!(fx.logger, "{body}");
    let day_one = fx.now();
    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&day_one, 1)));

    // Segment 1 is only 60 bytes in, but a new day always cuts
    fx.clock.advance_days(1);
    info!(fx.logger, "tomorrow\n");

    let day_two = fx.now();
    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&day_two, 0)));
    assert_eq!(
        fs::read_to_string(fx.segment(&day_two, 0)).unwrap(),
        "n1|2024-6-2 12:0:0|INFO|tomorrow\n"
    );
}

#[test]
fn test_oversized_record_is_written_whole() {
    let fx = Fixture::new();
    fx.logger.set_max_segment_bytes(Some(50));

    info!(fx.logger, "short\n");
    let big = "y".repeat(200);
    info!(fx.logger, "{big}");

    let ts = fx.now();
    let contents = fs::read_to_string(fx.segment(&ts, 1)).unwrap();
    assert!(contents.ends_with(&big));
    assert_eq!(contents, format!("n1|{ts}|INFO|{big}"));
    assert!(!fx.segment(&ts, 2).exists());

    // The next record moves on rather than growing the oversized segment
    info!(fx.logger, "after\n");
    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&ts, 2)));
}

#[test]
fn test_restart_resumes_partially_filled_segment() {
    let fx = Fixture::new();
    let ts = fx.now();
    fs::write(fx.segment(&ts, 0), vec![b'a'; 100]).unwrap();
    fs::write(fx.segment(&ts, 1), vec![b'b'; 10]).unwrap();

    fx.logger.set_max_segment_bytes(Some(100));
    info!(fx.logger, "resumed\n");

    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&ts, 1)));
    let contents = fs::read_to_string(fx.segment(&ts, 1)).unwrap();
    assert!(contents.starts_with("bbbbbbbbbbn1|"));
    assert_eq!(
        fx.logger.current_segment_bytes(),
        fs::metadata(fx.segment(&ts, 1)).unwrap().len()
    );
}

#[test]
fn test_failed_day_rotation_keeps_writing_to_previous_segment() {
    let fx = Fixture::new();
    info!(fx.logger, "first\n");
    let day_one = fx.now();

    fx.clock.advance_days(1);
    fs::create_dir(fx.segment(&fx.now(), 0)).unwrap();
    info!(fx.logger, "second\n");

    assert_eq!(fx.logger.current_segment_path(), Some(fx.segment(&day_one, 0)));
    let contents = fs::read_to_string(fx.segment(&day_one, 0)).unwrap();
    assert_eq!(
        contents,
        "n1|2024-6-1 12:0:0|INFO|first\nn1|2024-6-2 12:0:0|INFO|second\n"
    );
}

#[test]
fn test_unreadable_segment_metadata_aborts_rotation() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let logger = FileLogger::new("n1", logs.join("node"))
        .unwrap()
        .with_clock(clock.clone())
        .with_error_hook(move |e| sink.lock().unwrap().push(matches!(e, Error::Probe { .. })));

    info!(logger, "first\n");
    let day_one = clock.now().unwrap();
    let opened = segment_path(&logs.join("node"), &day_one, 0);
    assert_eq!(logger.current_segment_path(), Some(opened.clone()));

    // The open handle follows the rename; a plain file now blocks the lookup
    let moved = dir.path().join("moved");
    fs::rename(&logs, &moved).unwrap();
    fs::write(&logs, b"not a directory").unwrap();

    clock.advance_days(1);
    info!(logger, "second\n");

    assert_eq!(*seen.lock().unwrap(), [true]);
    assert_eq!(logger.current_segment_path(), Some(opened));
    assert_eq!(
        fs::read_to_string(segment_path(&moved.join("node"), &day_one, 0)).unwrap(),
        "n1|2024-6-1 12:0:0|INFO|first\nn1|2024-6-2 12:0:0|INFO|second\n"
    );
}

#[test]
fn test_every_severity_entry_point() {
    let fx = Fixture::new();
    let logger = &fx.logger;

    proven_logger_file::emerg!(logger, "a\n");
    proven_logger_file::alert!(logger, "b\n");
    proven_logger_file::crit!(logger, "c\n");
    proven_logger_file::err!(logger, "d\n");
    proven_logger_file::warning!(logger, "e\n");
    proven_logger_file::notice!(logger, "f\n");
    proven_logger_file::info!(logger, "g\n");
    proven_logger_file::debug!(logger, "h\n");

    let contents = fs::read_to_string(fx.segment(&fx.now(), 0)).unwrap();
    let tags: Vec<_> = contents
        .lines()
        .map(|line| line.split('|').nth(2).unwrap())
        .collect();
    assert_eq!(
        tags,
        ["EMERG", "ALERT", "CRIT", "ERR", "WARNING", "NOTICE", "INFO", "DEBUG"]
    );
}
