//! Terminal renderings of the report view and the paginated ledger sheets.

use rust_decimal::Decimal;

use crate::cli::output::side_heading;
use crate::currency::{format_currency, CurrencySettings};
use crate::domain::{PageData, ReportView, Transaction, TransactionType};

use super::table::{Table, TableColumn};

const PARTY_WIDTH: usize = 24;
const PARTICULARS_WIDTH: usize = 28;

fn entry_table(kind: TransactionType) -> Table {
    Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left(kind.party_label()).max(PARTY_WIDTH),
        TableColumn::left("Particulars").max(PARTICULARS_WIDTH),
        TableColumn::right("Amount").min(12),
    ])
}

fn entry_row(txn: &Transaction, currency: &CurrencySettings) -> Vec<String> {
    vec![
        txn.short_id().to_string(),
        txn.date_label(),
        txn.party.clone(),
        particulars_or_dash(txn),
        format_currency(txn.amount, currency),
    ]
}

fn particulars_or_dash(txn: &Transaction) -> String {
    if txn.particulars.trim().is_empty() {
        "-".into()
    } else {
        txn.particulars.clone()
    }
}

fn labelled_row(label: &str, amount: Decimal, currency: &CurrencySettings) -> Vec<String> {
    vec![
        String::new(),
        String::new(),
        label.to_string(),
        String::new(),
        format_currency(amount, currency),
    ]
}

/// Credit and debit sections for the report screen.
pub fn render_report(view: &ReportView, currency: &CurrencySettings) -> String {
    let summary = view.summary;
    let balanced = view.is_balanced();
    let total_label = |side: &'static str| {
        if balanced {
            side
        } else {
            "Filtered Total"
        }
    };

    let mut credit = entry_table(TransactionType::Receipt);
    if balanced {
        credit.push_row(labelled_row("Opening Balance (B/F)", summary.opening_balance, currency));
    }
    for txn in &view.receipts {
        credit.push_row(entry_row(txn, currency));
    }
    if view.receipts.is_empty() {
        credit.push_row(vec![String::new(), String::new(), "No receipts found".into()]);
    }
    credit.push_row(labelled_row(total_label("Total Receipts"), summary.total_receipts, currency));
    if balanced {
        credit.push_row(labelled_row("Grand Total", summary.credit_total(), currency));
    }

    let mut debit = entry_table(TransactionType::Expenditure);
    for txn in &view.expenditures {
        debit.push_row(entry_row(txn, currency));
    }
    if view.expenditures.is_empty() {
        debit.push_row(vec![String::new(), String::new(), "No expenditures found".into()]);
    }
    debit.push_row(labelled_row(
        total_label("Total Expenditure"),
        summary.total_expenditures,
        currency,
    ));
    if balanced {
        debit.push_row(labelled_row("Closing Balance (C/F)", summary.closing_balance, currency));
        debit.push_row(labelled_row("Grand Total", summary.debit_total(), currency));
    }

    format!(
        "{}\n{}\n\n{}\n{}",
        side_heading(TransactionType::Receipt),
        credit.render(),
        side_heading(TransactionType::Expenditure),
        debit.render()
    )
}

/// One ledger sheet with receipts and expenditures side by side.
pub fn render_page(page: &PageData, currency: &CurrencySettings) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Recv. From").max(PARTY_WIDTH),
        TableColumn::left("Particulars").max(18),
        TableColumn::right("Amount").min(12),
        TableColumn::left("|"),
        TableColumn::left("Date"),
        TableColumn::left("Paid To").max(PARTY_WIDTH),
        TableColumn::left("Particulars").max(18),
        TableColumn::right("Amount").min(12),
    ]);

    let mut bf = vec![String::new(); 9];
    bf[1] = "Brought Forward (B/F)".into();
    bf[3] = format_currency(page.opening_balance_bf, currency);
    bf[4] = "|".into();
    table.push_row(bf);

    for (receipt, expenditure) in page.receipts.iter().zip(&page.expenditures) {
        let mut row = slot_cells(receipt.as_ref(), currency);
        row.push("|".into());
        row.extend(slot_cells(expenditure.as_ref(), currency));
        table.push_row(row);
    }

    let footer = [
        (
            "Page Total Receipts",
            page.page_total_receipts,
            "Page Total Expenditure",
            page.page_total_expenditures,
        ),
        (
            "Total (B/F + Page)",
            page.left_grand_total(),
            "Carried Forward (C/F)",
            page.closing_balance_cf,
        ),
        (
            "Grand Total",
            page.left_grand_total(),
            "Grand Total",
            page.right_grand_total(),
        ),
    ];
    for (left_label, left, right_label, right) in footer {
        let mut row = vec![String::new(); 9];
        row[1] = left_label.into();
        row[3] = format_currency(left, currency);
        row[4] = "|".into();
        row[6] = right_label.into();
        row[8] = format_currency(right, currency);
        table.push_row(row);
    }

    format!(
        "Page {} of {}\n{}",
        page.page_number,
        page.total_pages,
        table.render()
    )
}

fn slot_cells(slot: Option<&Transaction>, currency: &CurrencySettings) -> Vec<String> {
    match slot {
        Some(txn) => vec![
            txn.date_label(),
            txn.party.clone(),
            particulars_or_dash(txn),
            format_currency(txn.amount, currency),
        ],
        None => vec![String::new(); 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{ReportService, SummaryService};
    use crate::domain::DateWindow;
    use chrono::NaiveDate;
    use std::num::NonZeroUsize;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "aaaaaaaa-1".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                kind: TransactionType::Receipt,
                party: "Client".into(),
                particulars: "Invoice".into(),
                labels: String::new(),
                amount: Decimal::from(100),
                timestamp: 1,
            },
            Transaction {
                id: "bbbbbbbb-2".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                kind: TransactionType::Expenditure,
                party: "Grocer".into(),
                particulars: String::new(),
                labels: String::new(),
                amount: Decimal::from(40),
                timestamp: 2,
            },
        ]
    }

    #[test]
    fn report_shows_balancing_rows_only_without_search() {
        let window = DateWindow::month_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let summary = SummaryService::summarize(&sample(), window, Decimal::ZERO);
        let currency = CurrencySettings::default();

        let full = render_report(&SummaryService::apply_search(&summary, ""), &currency);
        assert!(full.contains("Opening Balance (B/F)"));
        assert!(full.contains("Closing Balance (C/F)"));
        assert!(full.contains("₹60.00"));

        let filtered = render_report(&SummaryService::apply_search(&summary, "grocer"), &currency);
        assert!(filtered.contains("Filtered Total"));
        assert!(filtered.contains("No receipts found"));
        assert!(!filtered.contains("Closing Balance (C/F)"));
    }

    #[test]
    fn page_renders_padding_and_footer() {
        let (receipts, expenditures) = ReportService::split_by_type(&sample());
        let pages = ReportService::paginate(
            &receipts,
            &expenditures,
            Decimal::from(10),
            NonZeroUsize::new(3).unwrap(),
        );
        let text = render_page(&pages[0], &CurrencySettings::default());
        assert!(text.starts_with("Page 1 of 1"));
        assert!(text.contains("Carried Forward (C/F)"));
        assert!(text.contains("₹70.00"));
        // header, rule, B/F, three slots, three footer rows
        assert_eq!(text.lines().count(), 1 + 2 + 1 + 3 + 3);
    }
}
