use rust_decimal::Decimal;

use crate::domain::Transaction;
use crate::storage::TransactionStore;

use super::{ServiceError, ServiceResult};

/// Whole-list mutations against an injected store. Each call reads the current list,
/// applies one change and writes the full list back.
pub struct TransactionService;

impl TransactionService {
    pub fn record(store: &dyn TransactionStore, txn: Transaction) -> ServiceResult<Vec<Transaction>> {
        let mut current = store.load_transactions();
        tracing::info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "recording transaction");
        current.push(txn);
        store.replace_all_transactions(&current)?;
        Ok(current)
    }

    /// Replaces the stored entry that has the same id. The stored type is immutable.
    pub fn update(store: &dyn TransactionStore, txn: Transaction) -> ServiceResult<Vec<Transaction>> {
        let mut current = store.load_transactions();
        let Some(slot) = current.iter_mut().find(|existing| existing.has_id(&txn.id)) else {
            tracing::warn!(id = %txn.id, "update skipped: transaction not found");
            return Ok(current);
        };
        if slot.kind != txn.kind {
            return Err(ServiceError::Invalid(format!(
                "transaction type is fixed at creation ({})",
                slot.kind
            )));
        }
        let timestamp = slot.timestamp;
        *slot = Transaction { timestamp, ..txn };
        tracing::info!(id = %slot.id, "transaction updated");
        store.replace_all_transactions(&current)?;
        Ok(current)
    }

    /// Removes every entry whose id matches `id`. An unknown id leaves the list unchanged.
    pub fn delete(store: &dyn TransactionStore, id: &str) -> ServiceResult<Vec<Transaction>> {
        let mut current = store.load_transactions();
        let before = current.len();
        current.retain(|txn| !txn.has_id(id));
        if current.len() == before {
            tracing::warn!(id, "delete skipped: transaction not found");
            return Ok(current);
        }
        store.replace_all_transactions(&current)?;
        tracing::info!(id, removed = before - current.len(), "transaction deleted");
        Ok(current)
    }

    pub fn initial_balance(store: &dyn TransactionStore) -> Decimal {
        store.load_initial_balance()
    }

    pub fn set_initial_balance(store: &dyn TransactionStore, amount: Decimal) -> ServiceResult<Decimal> {
        store.save_initial_balance(amount)?;
        tracing::info!(amount = %amount, "initial balance saved");
        Ok(amount)
    }

    /// The last `count` entries in insertion order, newest first.
    pub fn recent(transactions: &[Transaction], count: usize) -> Vec<&Transaction> {
        transactions.iter().rev().take(count).collect()
    }

    /// Looks an entry up by exact id, falling back to a unique id prefix.
    pub fn find<'a>(
        transactions: &'a [Transaction],
        reference: &str,
    ) -> ServiceResult<&'a Transaction> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ServiceError::Invalid("transaction id is required".into()));
        }
        if let Some(exact) = transactions.iter().find(|txn| txn.has_id(reference)) {
            return Ok(exact);
        }
        let mut matches = transactions.iter().filter(|txn| txn.id.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(ServiceError::Invalid(format!(
                "id prefix `{}` matches more than one transaction",
                reference
            ))),
            (None, _) => Err(ServiceError::Invalid(format!(
                "no transaction with id `{}`",
                reference
            ))),
        }
    }
}
