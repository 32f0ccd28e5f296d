//! Pure data types for ledger entries and derived reports.

pub mod report;
pub mod transaction;

pub use report::{DateWindow, LedgerSummary, PageData, ReportSummary, ReportView};
pub use transaction::{Transaction, TransactionDraft, TransactionType};
