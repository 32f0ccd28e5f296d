use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::domain::Transaction;

use super::{Result, TransactionStore};

/// In-process store, used by tests and by callers embedding the ledger.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    transactions: RwLock<Vec<Transaction>>,
    initial_balance: RwLock<Decimal>,
}

impl MemoryStorage {
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
            initial_balance: RwLock::new(Decimal::ZERO),
        }
    }
}

impl TransactionStore for MemoryStorage {
    fn load_transactions(&self) -> Vec<Transaction> {
        self.transactions
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn replace_all_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut guard = self
            .transactions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = transactions.to_vec();
        Ok(())
    }

    fn load_initial_balance(&self) -> Decimal {
        self.initial_balance
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    fn save_initial_balance(&self, amount: Decimal) -> Result<()> {
        let mut guard = self
            .initial_balance
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = amount;
        Ok(())
    }
}
