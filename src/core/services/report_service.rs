use std::num::NonZeroUsize;

use rust_decimal::Decimal;

use crate::domain::{PageData, Transaction, TransactionType};

pub struct ReportService;

impl ReportService {
    /// Separates entries into receipts and expenditures, preserving order.
    pub fn split_by_type(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
        transactions
            .iter()
            .cloned()
            .partition(|txn| txn.kind == TransactionType::Receipt)
    }

    /// Lays both sides out on fixed-size sheets with a chained running balance.
    ///
    /// Both sides are paged in lockstep, so the longer side decides the page count and the
    /// shorter side is padded with empty slots. Every sheet carries forward what the next
    /// one brings forward.
    pub fn paginate(
        receipts: &[Transaction],
        expenditures: &[Transaction],
        opening_balance: Decimal,
        page_size: NonZeroUsize,
    ) -> Vec<PageData> {
        let size = page_size.get();
        let rows = receipts.len().max(expenditures.len());
        let total_pages = rows.div_ceil(size).max(1);

        let mut running = opening_balance;
        let mut pages = Vec::with_capacity(total_pages);
        for index in 0..total_pages {
            let page_receipts = page_slice(receipts, index, size);
            let page_expenditures = page_slice(expenditures, index, size);

            let page_total_receipts: Decimal = page_receipts.iter().map(|t| t.amount).sum();
            let page_total_expenditures: Decimal =
                page_expenditures.iter().map(|t| t.amount).sum();
            let closing_balance_cf = running + page_total_receipts - page_total_expenditures;

            pages.push(PageData {
                page_number: index + 1,
                total_pages,
                receipts: padded(page_receipts, size),
                expenditures: padded(page_expenditures, size),
                opening_balance_bf: running,
                page_total_receipts,
                page_total_expenditures,
                closing_balance_cf,
            });
            running = closing_balance_cf;
        }

        tracing::debug!(
            pages = total_pages,
            page_size = size,
            closing = %running,
            "report paginated"
        );
        pages
    }
}

fn page_slice(entries: &[Transaction], index: usize, size: usize) -> &[Transaction] {
    let start = (index * size).min(entries.len());
    let end = (start + size).min(entries.len());
    &entries[start..end]
}

fn padded(entries: &[Transaction], size: usize) -> Vec<Option<Transaction>> {
    let mut slots: Vec<Option<Transaction>> = entries.iter().cloned().map(Some).collect();
    slots.resize(size, None);
    slots
}
