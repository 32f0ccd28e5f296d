#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use account_master::{
    config::ConfigManager,
    domain::{Transaction, TransactionType},
    storage::JsonStorage,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and config backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (storage, config_manager)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn entry(id: &str, on: NaiveDate, kind: TransactionType, amount: i64) -> Transaction {
    Transaction {
        id: id.into(),
        date: on,
        kind,
        party: format!("Party {id}"),
        particulars: String::new(),
        labels: String::new(),
        amount: Decimal::from(amount),
        timestamp: 0,
    }
}

pub fn receipt(id: &str, on: NaiveDate, amount: i64) -> Transaction {
    entry(id, on, TransactionType::Receipt, amount)
}

pub fn expenditure(id: &str, on: NaiveDate, amount: i64) -> Transaction {
    entry(id, on, TransactionType::Expenditure, amount)
}
