//! Derived report structures. None of these are persisted.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::transaction::{Transaction, DATE_FORMAT};
use crate::errors::LedgerError;

/// Inclusive `[start, end]` reporting range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end < start {
            return Err(LedgerError::InvalidInput(
                "window end must not be before start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_before(&self, date: NaiveDate) -> bool {
        date < self.start
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub opening_balance: Decimal,
    pub total_receipts: Decimal,
    pub total_expenditures: Decimal,
    pub closing_balance: Decimal,
}

impl ReportSummary {
    /// Builds a summary whose closing balance is derived from the other three fields.
    pub fn balanced(opening: Decimal, receipts: Decimal, expenditures: Decimal) -> Self {
        Self {
            opening_balance: opening,
            total_receipts: receipts,
            total_expenditures: expenditures,
            closing_balance: opening + receipts - expenditures,
        }
    }

    /// Left side of the ledger: opening balance plus receipts.
    pub fn credit_total(&self) -> Decimal {
        self.opening_balance + self.total_receipts
    }

    /// Right side of the ledger: expenditures plus closing balance.
    pub fn debit_total(&self) -> Decimal {
        self.total_expenditures + self.closing_balance
    }
}

/// Result of summarizing a ledger for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub window: DateWindow,
    pub summary: ReportSummary,
    pub filtered: Vec<Transaction>,
}

/// What the report screen and export sinks display: the in-window entries split by side,
/// optionally narrowed by a search query.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub window: DateWindow,
    pub summary: ReportSummary,
    pub receipts: Vec<Transaction>,
    pub expenditures: Vec<Transaction>,
    pub search: Option<String>,
}

impl ReportView {
    /// Without a search both sides reconcile, so balancing rows are shown.
    pub fn is_balanced(&self) -> bool {
        self.search.is_none()
    }

    pub fn row_count(&self) -> usize {
        self.receipts.len().max(self.expenditures.len())
    }
}

/// One printed ledger sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData {
    pub page_number: usize,
    pub total_pages: usize,
    pub receipts: Vec<Option<Transaction>>,
    pub expenditures: Vec<Option<Transaction>>,
    pub opening_balance_bf: Decimal,
    pub page_total_receipts: Decimal,
    pub page_total_expenditures: Decimal,
    pub closing_balance_cf: Decimal,
}

impl PageData {
    pub fn left_grand_total(&self) -> Decimal {
        self.opening_balance_bf + self.page_total_receipts
    }

    pub fn right_grand_total(&self) -> Decimal {
        self.page_total_expenditures + self.closing_balance_cf
    }

    pub fn is_last(&self) -> bool {
        self.page_number == self.total_pages
    }
}
