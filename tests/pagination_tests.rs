mod common;

use std::num::NonZeroUsize;

use account_master::core::services::{ReportService, SummaryService};
use account_master::domain::DateWindow;
use common::{date, expenditure, receipt};
use rust_decimal::Decimal;

fn five() -> NonZeroUsize {
    NonZeroUsize::new(5).unwrap()
}

#[test]
fn seven_receipts_two_expenditures_make_two_sheets() {
    let mut ledger: Vec<_> = (1..=7)
        .map(|day| receipt(&format!("r{day}"), date(2024, 1, day), 10))
        .collect();
    ledger.push(expenditure("e1", date(2024, 1, 2), 15));
    ledger.push(expenditure("e2", date(2024, 1, 4), 5));

    let window = DateWindow::month_of(date(2024, 1, 1));
    let summary = SummaryService::summarize(&ledger, window, Decimal::from(20));
    let (receipts, expenditures) = ReportService::split_by_type(&summary.filtered);
    let pages = ReportService::paginate(
        &receipts,
        &expenditures,
        summary.summary.opening_balance,
        five(),
    );

    assert_eq!(pages.len(), 2);
    let first = &pages[0];
    assert_eq!(first.page_number, 1);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.receipts.iter().flatten().count(), 5);
    assert_eq!(first.expenditures.iter().flatten().count(), 2);
    assert_eq!(first.expenditures.len(), 5);
    assert_eq!(first.opening_balance_bf, Decimal::from(20));
    assert_eq!(first.page_total_receipts, Decimal::from(50));
    assert_eq!(first.page_total_expenditures, Decimal::from(20));
    assert_eq!(first.closing_balance_cf, Decimal::from(50));

    let second = &pages[1];
    assert!(second.is_last());
    assert_eq!(second.receipts.iter().flatten().count(), 2);
    assert!(second.expenditures.iter().all(Option::is_none));
    assert_eq!(second.opening_balance_bf, first.closing_balance_cf);
    assert_eq!(second.closing_balance_cf, Decimal::from(70));
}

#[test]
fn carried_forward_chain_ends_at_closing_balance() {
    let mut ledger = Vec::new();
    for day in 1..=23 {
        ledger.push(receipt(&format!("r{day}"), date(2024, 3, day), i64::from(day) * 3));
    }
    for day in 1..=11 {
        ledger.push(expenditure(&format!("e{day}"), date(2024, 3, day), 13));
    }
    ledger.push(receipt("old", date(2024, 2, 10), 400));

    let window = DateWindow::month_of(date(2024, 3, 1));
    let summary = SummaryService::summarize(&ledger, window, Decimal::from(-50));
    let (receipts, expenditures) = ReportService::split_by_type(&summary.filtered);
    let pages = ReportService::paginate(
        &receipts,
        &expenditures,
        summary.summary.opening_balance,
        five(),
    );

    assert_eq!(pages.len(), 5);
    assert_eq!(pages[0].opening_balance_bf, Decimal::from(350));
    for pair in pages.windows(2) {
        assert_eq!(pair[1].opening_balance_bf, pair[0].closing_balance_cf);
    }
    for page in &pages {
        assert_eq!(page.left_grand_total(), page.right_grand_total());
    }
    assert_eq!(
        pages.last().unwrap().closing_balance_cf,
        summary.summary.closing_balance
    );
}

#[test]
fn empty_window_produces_one_blank_sheet() {
    let pages = ReportService::paginate(&[], &[], Decimal::from(9), five());
    assert_eq!(pages.len(), 1);
    assert!(pages[0].receipts.iter().all(Option::is_none));
    assert!(pages[0].expenditures.iter().all(Option::is_none));
    assert_eq!(pages[0].closing_balance_cf, Decimal::from(9));
}
