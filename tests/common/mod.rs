#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use subscription_core::{domain::Subscription, storage::parse_snapshot};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Backend-shaped snapshot: mixed id types, comma decimals, one inactive row
/// and one row with an impossible anchor date.
pub const SAMPLE_SNAPSHOT: &str = r#"[
    {"id": 1, "name": "Video", "price": "43,00", "next_payment": "2024-01-31", "period": "monthly", "active": true},
    {"id": 2, "name": "Music", "price": 20, "next_payment": "2024-02-10", "period": "monthly", "active": true},
    {"id": 3, "name": "Domain", "price": "60", "next_payment": "2023-03-02", "period": "yearly", "active": true},
    {"id": 4, "name": "Gym", "price": 120, "next_payment": "2024-01-05", "period": "monthly", "active": false},
    {"id": "x-5", "name": "Broken", "price": "abc", "next_payment": "2024-02-30", "period": null}
]"#;

/// NBP table A response trimmed to a few currencies.
pub const NBP_PAYLOAD: &str = r#"[{
    "table": "A",
    "no": "122/A/NBP/2024",
    "effectiveDate": "2024-06-25",
    "rates": [
        {"currency": "euro", "code": "EUR", "mid": 4.3},
        {"currency": "dolar amerykański", "code": "USD", "mid": 4.0},
        {"currency": "funt szterling", "code": "GBP", "mid": 5.1},
        {"currency": "broken", "code": "XXX", "mid": "n/a"}
    ]
}]"#;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn sample_subscriptions() -> Vec<Subscription> {
    parse_snapshot(SAMPLE_SNAPSHOT).expect("sample snapshot parses")
}

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}
