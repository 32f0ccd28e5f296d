pub mod json_backend;
pub mod memory;

use rust_decimal::Decimal;

use crate::{domain::Transaction, errors::LedgerError};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key-value persistence for the ledger: one list of entries and one opening balance.
///
/// Reads never fail. A missing or unreadable list loads as empty and a missing balance
/// loads as zero. Writes replace the stored value wholesale.
pub trait TransactionStore: Send + Sync {
    fn load_transactions(&self) -> Vec<Transaction>;
    fn replace_all_transactions(&self, transactions: &[Transaction]) -> Result<()>;
    fn load_initial_balance(&self) -> Decimal;
    fn save_initial_balance(&self, amount: Decimal) -> Result<()>;
}

pub use json_backend::{BackupInfo, JsonStorage};
pub use memory::MemoryStorage;
