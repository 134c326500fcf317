#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use bill_reminders::snapshot::Snapshot;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Writes `snapshot` as JSON into a fresh temp directory and returns its path.
pub fn write_snapshot(snapshot: &Snapshot) -> PathBuf {
    let path = temp_dir().join("snapshot.json");
    let json = serde_json::to_string_pretty(snapshot).expect("serialize snapshot");
    std::fs::write(&path, json).expect("write snapshot");
    path
}

pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 6, 0, 0).unwrap()
}

pub fn reference_today() -> NaiveDate {
    reference_now().date_naive()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
