use rust_decimal::Decimal;

use crate::domain::{
    DateWindow, LedgerSummary, ReportSummary, ReportView, Transaction, TransactionType,
};

pub struct SummaryService;

impl SummaryService {
    /// Folds the full ledger into the balances for `window`.
    ///
    /// Entries dated before the window adjust the opening balance, entries inside it are
    /// returned in `(date, timestamp)` order and totalled, and later entries are ignored.
    pub fn summarize(
        transactions: &[Transaction],
        window: DateWindow,
        initial_balance: Decimal,
    ) -> LedgerSummary {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.timestamp.cmp(&b.timestamp)));

        let mut opening = initial_balance;
        let mut receipts = Decimal::ZERO;
        let mut expenditures = Decimal::ZERO;
        let mut filtered = Vec::new();

        for txn in sorted {
            if window.is_before(txn.date) {
                opening = txn.apply_to(opening);
            } else if window.contains(txn.date) {
                match txn.kind {
                    TransactionType::Receipt => receipts += txn.amount,
                    TransactionType::Expenditure => expenditures += txn.amount,
                }
                filtered.push(txn.clone());
            }
        }

        let summary = ReportSummary::balanced(opening, receipts, expenditures);
        tracing::debug!(
            window = %window,
            in_window = filtered.len(),
            opening = %summary.opening_balance,
            closing = %summary.closing_balance,
            "ledger summarized"
        );

        LedgerSummary {
            window,
            summary,
            filtered,
        }
    }

    /// Narrows the in-window entries by a free-text query.
    ///
    /// Displayed totals are recomputed from the matches; opening and closing balances
    /// keep the unfiltered window values.
    pub fn apply_search(ledger: &LedgerSummary, query: &str) -> ReportView {
        let needle = query.trim().to_lowercase();
        let mut summary = ledger.summary;

        let visible: Vec<&Transaction> = if needle.is_empty() {
            ledger.filtered.iter().collect()
        } else {
            let matches: Vec<&Transaction> = ledger
                .filtered
                .iter()
                .filter(|txn| matches_query(txn, &needle))
                .collect();
            summary.total_receipts = side_total(&matches, TransactionType::Receipt);
            summary.total_expenditures = side_total(&matches, TransactionType::Expenditure);
            matches
        };

        let (receipts, expenditures) = split_refs(&visible);
        ReportView {
            window: ledger.window,
            summary,
            receipts,
            expenditures,
            search: (!needle.is_empty()).then(|| query.trim().to_string()),
        }
    }
}

fn matches_query(txn: &Transaction, needle: &str) -> bool {
    txn.particulars.to_lowercase().contains(needle)
        || txn.party.to_lowercase().contains(needle)
        || txn.amount_label().contains(needle)
        || txn.date_label().contains(needle)
}

fn side_total(entries: &[&Transaction], kind: TransactionType) -> Decimal {
    entries
        .iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

fn split_refs(entries: &[&Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    let mut receipts = Vec::new();
    let mut expenditures = Vec::new();
    for txn in entries {
        match txn.kind {
            TransactionType::Receipt => receipts.push((*txn).clone()),
            TransactionType::Expenditure => expenditures.push((*txn).clone()),
        }
    }
    (receipts, expenditures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: &str, on: NaiveDate, kind: TransactionType, amount: i64, ts: i64) -> Transaction {
        Transaction {
            id: id.into(),
            date: on,
            kind,
            party: format!("party-{id}"),
            particulars: String::new(),
            labels: String::new(),
            amount: Decimal::from(amount),
            timestamp: ts,
        }
    }

    #[test]
    fn same_day_entries_follow_timestamp_order() {
        let day = date(2024, 1, 10);
        let ledger = vec![
            entry("late", day, TransactionType::Receipt, 5, 300),
            entry("early", day, TransactionType::Receipt, 5, 100),
            entry("middle", day, TransactionType::Expenditure, 5, 200),
        ];
        let window = DateWindow::month_of(day);
        let result = SummaryService::summarize(&ledger, window, Decimal::ZERO);
        let order: Vec<&str> = result.filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
    }

    #[test]
    fn future_entries_do_not_touch_opening_balance() {
        let ledger = vec![
            entry("a", date(2024, 1, 5), TransactionType::Receipt, 100, 1),
            entry("b", date(2024, 3, 1), TransactionType::Expenditure, 70, 2),
        ];
        let window = DateWindow::month_of(date(2024, 1, 1));
        let result = SummaryService::summarize(&ledger, window, Decimal::from(10));
        assert_eq!(result.summary.opening_balance, Decimal::from(10));
        assert_eq!(result.summary.closing_balance, Decimal::from(110));
        assert_eq!(result.filtered.len(), 1);
    }

    #[test]
    fn search_recomputes_totals_but_freezes_balances() {
        let mut rent = entry("r", date(2024, 1, 3), TransactionType::Expenditure, 500, 1);
        rent.particulars = "Office Rent".into();
        let ledger = vec![
            entry("s", date(2024, 1, 2), TransactionType::Receipt, 1000, 0),
            rent,
            entry("x", date(2024, 1, 4), TransactionType::Expenditure, 200, 2),
        ];
        let window = DateWindow::month_of(date(2024, 1, 1));
        let full = SummaryService::summarize(&ledger, window, Decimal::from(50));
        let view = SummaryService::apply_search(&full, "  rent ");

        assert_eq!(view.search.as_deref(), Some("rent"));
        assert!(!view.is_balanced());
        assert_eq!(view.expenditures.len(), 1);
        assert!(view.receipts.is_empty());
        assert_eq!(view.summary.total_receipts, Decimal::ZERO);
        assert_eq!(view.summary.total_expenditures, Decimal::from(500));
        assert_eq!(view.summary.opening_balance, full.summary.opening_balance);
        assert_eq!(view.summary.closing_balance, full.summary.closing_balance);
    }

    #[test]
    fn blank_search_keeps_full_view() {
        let ledger = vec![
            entry("a", date(2024, 1, 2), TransactionType::Receipt, 10, 0),
            entry("b", date(2024, 1, 3), TransactionType::Expenditure, 4, 1),
        ];
        let full = SummaryService::summarize(&ledger, DateWindow::month_of(date(2024, 1, 1)), Decimal::ZERO);
        let view = SummaryService::apply_search(&full, "   ");
        assert!(view.is_balanced());
        assert_eq!(view.summary, full.summary);
        assert_eq!(view.receipts.len(), 1);
        assert_eq!(view.expenditures.len(), 1);
    }

    #[test]
    fn search_matches_amount_and_date_text() {
        let mut odd = entry("a", date(2024, 1, 12), TransactionType::Receipt, 0, 0);
        odd.amount = Decimal::new(12550, 2);
        let ledger = vec![odd, entry("b", date(2024, 1, 20), TransactionType::Receipt, 7, 1)];
        let full = SummaryService::summarize(&ledger, DateWindow::month_of(date(2024, 1, 1)), Decimal::ZERO);

        let by_amount = SummaryService::apply_search(&full, "125.5");
        assert_eq!(by_amount.receipts.len(), 1);
        assert_eq!(by_amount.receipts[0].id, "a");

        let by_date = SummaryService::apply_search(&full, "2024-01-20");
        assert_eq!(by_date.receipts.len(), 1);
        assert_eq!(by_date.receipts[0].id, "b");
    }
}
