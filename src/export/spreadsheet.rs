use std::io::Write;

use csv::WriterBuilder;
use rust_decimal::Decimal;

use crate::domain::Transaction;

use super::{ExportResult, ReportExport};

const COLUMNS: usize = 11;
const SEPARATOR: &str = "|";

/// Side-by-side sheet: receipts on the left, expenditures on the right, balances below.
pub fn write_report(export: &ReportExport<'_>, out: &mut dyn Write) -> ExportResult<()> {
    let view = export.view;
    let symbol = export.currency.symbol();
    let amount_header = format!("Amount ({})", symbol);
    let mut writer = WriterBuilder::new().from_writer(out);

    let mut title = blank_row();
    title[0] = format!("Report Period: {}", view.window);
    if let Some(query) = &view.search {
        title[6] = format!("Filtered: \"{}\"", query);
    }
    writer.write_record(&title)?;
    writer.write_record(blank_row())?;
    writer.write_record([
        "Date",
        "Particulars",
        "Labels",
        "Received From",
        amount_header.as_str(),
        SEPARATOR,
        "Date",
        "Particulars",
        "Labels",
        "Paid To",
        amount_header.as_str(),
    ])?;

    for index in 0..view.row_count() {
        let mut row = Vec::with_capacity(COLUMNS);
        row.extend(entry_cells(view.receipts.get(index)));
        row.push(SEPARATOR.to_string());
        row.extend(entry_cells(view.expenditures.get(index)));
        writer.write_record(&row)?;
    }

    let summary = view.summary;
    writer.write_record(blank_row())?;
    writer.write_record(footer_row(
        "Opening Balance (B/F):",
        summary.opening_balance,
        "Total Expenditure:",
        summary.total_expenditures,
    ))?;
    writer.write_record(footer_row(
        "Total Receipts:",
        summary.total_receipts,
        "Closing Balance (C/F):",
        summary.closing_balance,
    ))?;
    writer.write_record(footer_row(
        "GRAND TOTAL:",
        summary.credit_total(),
        "GRAND TOTAL:",
        summary.debit_total(),
    ))?;
    writer.flush()?;
    Ok(())
}

fn blank_row() -> Vec<String> {
    vec![String::new(); COLUMNS]
}

fn entry_cells(entry: Option<&Transaction>) -> [String; 5] {
    match entry {
        Some(txn) => [
            txn.date_label(),
            txn.particulars.clone(),
            txn.labels.clone(),
            txn.party.clone(),
            txn.amount_label(),
        ],
        None => Default::default(),
    }
}

fn footer_row(left_label: &str, left: Decimal, right_label: &str, right: Decimal) -> Vec<String> {
    let mut row = blank_row();
    row[3] = left_label.to_string();
    row[4] = plain_amount(left);
    row[5] = SEPARATOR.to_string();
    row[9] = right_label.to_string();
    row[10] = plain_amount(right);
    row
}

fn plain_amount(value: Decimal) -> String {
    value.round_dp(2).normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::services::SummaryService,
        currency::CurrencySettings,
        domain::{DateWindow, TransactionType},
    };
    use chrono::NaiveDate;
    use std::num::NonZeroUsize;

    fn txn(id: &str, day: u32, kind: TransactionType, amount: i64) -> Transaction {
        Transaction {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            kind,
            party: format!("party-{}", id),
            particulars: format!("note {}", id),
            labels: String::new(),
            amount: Decimal::from(amount),
            timestamp: day as i64,
        }
    }

    #[test]
    fn writes_side_by_side_rows_and_footer() {
        let transactions = vec![
            txn("r1", 5, TransactionType::Receipt, 100),
            txn("e1", 10, TransactionType::Expenditure, 40),
            txn("r2", 12, TransactionType::Receipt, 25),
        ];
        let window = DateWindow::month_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let summary = SummaryService::summarize(&transactions, window, Decimal::from(10));
        let view = SummaryService::apply_search(&summary, "");
        let export = ReportExport::new(
            &view,
            CurrencySettings::default(),
            NonZeroUsize::new(15).unwrap(),
        );

        let mut buffer = Vec::new();
        write_report(&export, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Report Period: 2024-01-01 to 2024-01-31"));
        assert_eq!(lines[1], ",,,,,,,,,,");
        assert!(lines[2].contains("Received From,Amount (₹),|,Date"));
        assert_eq!(lines[3], "2024-01-05,note r1,,party-r1,100,|,2024-01-10,note e1,,party-e1,40");
        assert_eq!(lines[4], "2024-01-12,note r2,,party-r2,25,|,,,,,");
        assert_eq!(lines[6], ",,,Opening Balance (B/F):,10,|,,,,Total Expenditure:,40");
        assert_eq!(lines[7], ",,,Total Receipts:,125,|,,,,Closing Balance (C/F):,95");
        assert_eq!(lines[8], ",,,GRAND TOTAL:,135,|,,,,GRAND TOTAL:,135");
        assert_eq!(lines.len(), 9);
    }
}
