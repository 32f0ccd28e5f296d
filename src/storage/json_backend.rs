use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::Transaction,
    errors::LedgerError,
};

use super::{Result, TransactionStore};

const TRANSACTIONS_FILE: &str = "transactions_v1.json";
const INITIAL_BALANCE_FILE: &str = "initial_balance_v1.json";
const BACKUP_PREFIX: &str = "transactions";
const UNREADABLE_PREFIX: &str = "unreadable";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Describes a snapshot of the transactions file taken before an overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

/// Filesystem-backed JSON persistence for the ledger.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.root.join(TRANSACTIONS_FILE)
    }

    pub fn initial_balance_path(&self) -> PathBuf {
        self.root.join(INITIAL_BALANCE_FILE)
    }

    pub fn try_load_transactions(&self) -> Result<Vec<Transaction>> {
        let path = self.transactions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path
                .file_name()
                .and_then(|name| name.to_str())
                .filter(|name| name.starts_with(BACKUP_PREFIX))
            {
                entries.push(BackupInfo {
                    name: name.to_string(),
                    created_at: parse_backup_timestamp(name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }

    /// Copies a snapshot back over the live transactions file and returns its entries.
    pub fn restore_backup(&self, name: &str) -> Result<Vec<Transaction>> {
        let source = self.backups_dir.join(name);
        if !source.exists() {
            return Err(LedgerError::Storage(format!("backup `{}` not found", name)));
        }
        let data = fs::read_to_string(&source)?;
        let transactions: Vec<Transaction> = serde_json::from_str(&data)?;
        self.replace_all_transactions(&transactions)?;
        tracing::info!(backup = name, count = transactions.len(), "backup restored");
        Ok(transactions)
    }

    fn backup_existing_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let backup_path = self.next_snapshot_path(BACKUP_PREFIX)?;
        fs::copy(path, &backup_path)?;
        self.prune_backups()?;
        Ok(())
    }

    /// Keeps a copy of a transactions file that failed to parse. These copies
    /// are not listed as backups and are never pruned.
    fn quarantine_unreadable(&self, path: &Path) -> Result<PathBuf> {
        let target = self.next_snapshot_path(UNREADABLE_PREFIX)?;
        fs::copy(path, &target)?;
        Ok(target)
    }

    /// `<prefix>_<YYYYMMDD_HHMMSS>_<millis>.json`, with a `_<n>` counter when
    /// that name is already taken.
    fn next_snapshot_path(&self, prefix: &str) -> Result<PathBuf> {
        ensure_dir(&self.backups_dir)?;
        let now = Utc::now();
        let stem = format!(
            "{}_{}_{:03}",
            prefix,
            now.format(BACKUP_TIMESTAMP_FORMAT),
            now.timestamp_subsec_millis().min(999)
        );
        let mut candidate = self.backups_dir.join(format!("{}.{}", stem, BACKUP_EXTENSION));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self
                .backups_dir
                .join(format!("{}_{}.{}", stem, counter, BACKUP_EXTENSION));
            counter += 1;
        }
        Ok(candidate)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl TransactionStore for JsonStorage {
    fn load_transactions(&self) -> Vec<Transaction> {
        match self.try_load_transactions() {
            Ok(transactions) => transactions,
            Err(err) => {
                let path = self.transactions_path();
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load transactions; starting with an empty ledger"
                );
                match self.quarantine_unreadable(&path) {
                    Ok(copy) => {
                        tracing::warn!(copy = %copy.display(), "unreadable transactions file kept")
                    }
                    Err(copy_err) => {
                        tracing::error!(error = %copy_err, "could not keep a copy of the unreadable file")
                    }
                }
                Vec::new()
            }
        }
    }

    fn replace_all_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let path = self.transactions_path();
        self.backup_existing_file(&path)?;
        let json = serde_json::to_string_pretty(transactions)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(count = transactions.len(), path = %path.display(), "transactions saved");
        Ok(())
    }

    fn load_initial_balance(&self) -> Decimal {
        let path = self.initial_balance_path();
        if !path.exists() {
            return Decimal::ZERO;
        }
        let parsed = fs::read_to_string(&path)
            .map_err(LedgerError::from)
            .and_then(|data| parse_balance(&data));
        match parsed {
            Ok(amount) => amount,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load initial balance; using zero");
                Decimal::ZERO
            }
        }
    }

    fn save_initial_balance(&self, amount: Decimal) -> Result<()> {
        let path = self.initial_balance_path();
        let json = serde_json::to_string(&StoredBalance(amount))?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredBalance(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Balances were historically stored as a bare number or as a quoted number.
fn parse_balance(data: &str) -> Result<Decimal> {
    let trimmed = data.trim();
    if let Ok(StoredBalance(amount)) = serde_json::from_str::<StoredBalance>(trimmed) {
        return Ok(amount);
    }
    let unquoted: String = serde_json::from_str(trimmed)?;
    unquoted
        .trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Storage(format!("invalid initial balance `{}`", unquoted)))
}

/// Accepts `transactions_<date>_<time>[_<millis>][_<n>].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let raw = trimmed.strip_prefix(&format!("{}_", BACKUP_PREFIX))?;
    let mut parts = raw.split('_');
    let (day, time) = (parts.next()?, parts.next()?);
    let naive = NaiveDateTime::parse_from_str(&format!("{}_{}", day, time), BACKUP_TIMESTAMP_FORMAT).ok()?;
    let millis = match parts.next() {
        Some(value) => value.parse::<i64>().ok()?,
        None => 0,
    };
    Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample(id: &str) -> Transaction {
        Transaction {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            kind: TransactionType::Receipt,
            party: "Client".into(),
            particulars: "Invoice".into(),
            labels: String::new(),
            amount: Decimal::new(10050, 2),
            timestamp: 1,
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        storage
            .replace_all_transactions(&[sample("a"), sample("b")])
            .expect("save");
        let loaded = storage.load_transactions();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].amount, Decimal::new(10050, 2));
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.transactions_path(), "{not json").unwrap();
        assert!(storage.load_transactions().is_empty());
        assert!(storage.try_load_transactions().is_err());
    }

    #[test]
    fn overwrite_keeps_bounded_backups() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.replace_all_transactions(&[sample("a")]).unwrap();
        storage.replace_all_transactions(&[]).unwrap();
        let backups = storage.list_backups().expect("list backups");
        assert!(!backups.is_empty());
        assert!(backups.len() <= 3);
    }

    #[test]
    fn restore_brings_back_previous_list() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.replace_all_transactions(&[sample("a")]).unwrap();
        storage.replace_all_transactions(&[]).unwrap();
        let backup = storage.list_backups().unwrap().remove(0);
        let restored = storage.restore_backup(&backup.name).expect("restore");
        assert_eq!(restored.len(), 1);
        assert_eq!(storage.load_transactions()[0].id, "a");
        assert!(storage.restore_backup("missing.json").is_err());
    }

    #[test]
    fn initial_balance_defaults_and_persists() {
        let (storage, _guard) = storage_with_temp_dir();
        assert_eq!(storage.load_initial_balance(), Decimal::ZERO);
        storage.save_initial_balance(Decimal::new(-1250, 1)).unwrap();
        assert_eq!(storage.load_initial_balance(), Decimal::new(-1250, 1));

        fs::write(storage.initial_balance_path(), "\"250.75\"").unwrap();
        assert_eq!(storage.load_initial_balance(), Decimal::new(25075, 2));

        fs::write(storage.initial_balance_path(), "garbage").unwrap();
        assert_eq!(storage.load_initial_balance(), Decimal::ZERO);
    }

    #[test]
    fn backup_names_parse_to_timestamps() {
        let legacy = parse_backup_timestamp("transactions_20240105_101530.json").unwrap();
        let precise = parse_backup_timestamp("transactions_20240105_101530_250.json").unwrap();
        let repeated = parse_backup_timestamp("transactions_20240105_101530_250_2.json").unwrap();
        assert_eq!(precise - legacy, Duration::milliseconds(250));
        assert_eq!(repeated, precise);
        assert!(parse_backup_timestamp("other_20240105_101530.json").is_none());
        assert!(parse_backup_timestamp("transactions_2024.json").is_none());
        assert!(parse_backup_timestamp("unreadable_20240105_101530_250.json").is_none());
    }

    #[test]
    fn writes_in_the_same_instant_get_distinct_snapshots() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.replace_all_transactions(&[sample("a")]).unwrap();
        storage.replace_all_transactions(&[sample("b")]).unwrap();
        storage.replace_all_transactions(&[]).unwrap();
        let backups = storage.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_ne!(backups[0].name, backups[1].name);
    }

    #[test]
    fn unreadable_file_survives_later_writes() {
        let (storage, guard) = storage_with_temp_dir();
        let original = r#"[{"id": 1, "date": "2024-01-05", "type": "RECEIPT", "party": "Client", "amount": null}]"#;
        fs::write(storage.transactions_path(), original).unwrap();
        assert!(storage.load_transactions().is_empty());

        for round in 0..5 {
            let ledger: Vec<Transaction> = (0..round).map(|n| sample(&n.to_string())).collect();
            storage.replace_all_transactions(&ledger).unwrap();
        }

        let kept = fs::read_dir(guard.path().join("backups"))
            .unwrap()
            .filter_map(|entry| fs::read_to_string(entry.unwrap().path()).ok())
            .any(|content| content == original);
        assert!(kept, "original ledger file is gone from every backup");
        assert!(storage
            .list_backups()
            .unwrap()
            .iter()
            .all(|backup| backup.name.starts_with(BACKUP_PREFIX)));
    }
}
