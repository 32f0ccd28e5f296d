use std::fmt::Write as _;

use crate::{
    currency::{format_currency, CurrencySettings},
    domain::{PageData, Transaction},
};

use super::ReportExport;

const TITLE: &str = "Account Master Report";

const STYLE: &str = r#"<style>
@page { size: A4 landscape; margin: 10mm; }
body { font-family: sans-serif; margin: 0; color: #1e293b; }
.sheet { page-break-after: always; padding: 24px 32px; }
.sheet:last-child { page-break-after: avoid; }
.header { text-align: center; border-bottom: 2px solid #cbd5e1; margin-bottom: 10px; position: relative; }
.title { font-size: 24px; text-transform: uppercase; margin: 0; color: #312e81; }
.subtitle { font-size: 13px; color: #64748b; margin: 4px 0 8px; }
.page-no { position: absolute; top: 0; right: 0; font-size: 11px; color: #64748b; }
.grid { display: flex; border: 2px solid #cbd5e1; }
.side { width: 50%; }
.side + .side { border-left: 2px solid #cbd5e1; }
.side h2 { margin: 0; padding: 8px; text-align: center; font-size: 14px; text-transform: uppercase; }
.credit h2 { background: #d1fae5; color: #065f46; }
.debit h2 { background: #ffe4e6; color: #9f1239; }
table { width: 100%; border-collapse: collapse; font-size: 12px; }
th, td { padding: 5px 6px; border-bottom: 1px solid #e2e8f0; text-align: left; vertical-align: top; }
td.amount, th.amount { text-align: right; white-space: nowrap; }
td.date { white-space: nowrap; }
tr.balance td { background: #f1f5f9; font-weight: 700; }
tr.empty td { height: 18px; }
.footer { border: 2px solid #cbd5e1; border-top: none; font-size: 12px; }
.footer .row { display: flex; }
.footer .cell { width: 50%; display: flex; justify-content: space-between; padding: 6px 10px; }
.footer .cell + .cell { border-left: 2px solid #cbd5e1; }
.footer .label { font-weight: 800; text-transform: uppercase; }
.footer .grand { background: #f1f5f9; }
</style>"#;

/// Renders one landscape sheet per ledger page as a standalone HTML document.
pub fn render_document(export: &ReportExport<'_>) -> String {
    let pages = export.pages();
    let view = export.view;
    let mut subtitle = format!("Period: {}", view.window);
    if let Some(query) = &view.search {
        let _ = write!(subtitle, " (Filtered: \"{}\")", query);
    }

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", TITLE);
    html.push_str(STYLE);
    html.push_str("\n</head>\n<body>\n");
    for page in &pages {
        render_page(&mut html, page, &escape_html(&subtitle), &export.currency);
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_page(html: &mut String, page: &PageData, subtitle: &str, currency: &CurrencySettings) {
    let money = |value| escape_html(&format_currency(value, currency));
    let _ = write!(
        html,
        "<section class=\"sheet\">\n<div class=\"header\">\n<h1 class=\"title\">{}</h1>\n\
         <div class=\"subtitle\">{}</div>\n<div class=\"page-no\">Page {} of {}</div>\n</div>\n",
        TITLE, subtitle, page.page_number, page.total_pages
    );

    html.push_str("<div class=\"grid\">\n<div class=\"side credit\">\n<h2>Credit (Receipts)</h2>\n<table>\n");
    let _ = writeln!(
        html,
        "<tr class=\"balance\"><td colspan=\"3\">Brought Forward (B/F)</td><td class=\"amount\">{}</td></tr>",
        money(page.opening_balance_bf)
    );
    push_header(html, "Recv. From");
    for slot in &page.receipts {
        push_row(html, slot.as_ref(), currency);
    }
    html.push_str("</table>\n</div>\n<div class=\"side debit\">\n<h2>Debit (Expenditure)</h2>\n<table>\n");
    html.push_str("<tr class=\"balance\"><td colspan=\"4\">&nbsp;</td></tr>\n");
    push_header(html, "Paid To");
    for slot in &page.expenditures {
        push_row(html, slot.as_ref(), currency);
    }
    html.push_str("</table>\n</div>\n</div>\n");

    html.push_str("<div class=\"footer\">\n");
    push_footer_row(
        html,
        "",
        ("Page Total Receipts", money(page.page_total_receipts)),
        ("Page Total Expenditure", money(page.page_total_expenditures)),
    );
    push_footer_row(
        html,
        "",
        ("Total (B/F + Page)", money(page.left_grand_total())),
        ("Carried Forward (C/F)", money(page.closing_balance_cf)),
    );
    push_footer_row(
        html,
        " grand",
        ("Grand Total", money(page.left_grand_total())),
        ("Grand Total", money(page.right_grand_total())),
    );
    html.push_str("</div>\n</section>\n");
}

fn push_header(html: &mut String, party_label: &str) {
    let _ = writeln!(
        html,
        "<tr><th>Date</th><th>{}</th><th>Particulars</th><th class=\"amount\">Amount</th></tr>",
        party_label
    );
}

fn push_row(html: &mut String, slot: Option<&Transaction>, currency: &CurrencySettings) {
    match slot {
        Some(txn) => {
            let particulars = if txn.particulars.trim().is_empty() {
                "-".to_string()
            } else {
                escape_html(&txn.particulars)
            };
            let _ = writeln!(
                html,
                "<tr><td class=\"date\">{}</td><td>{}</td><td>{}</td><td class=\"amount\">{}</td></tr>",
                txn.date_label(),
                escape_html(&txn.party),
                particulars,
                escape_html(&format_currency(txn.amount, currency))
            );
        }
        None => html.push_str("<tr class=\"empty\"><td colspan=\"4\">&nbsp;</td></tr>\n"),
    }
}

fn push_footer_row(html: &mut String, class: &str, left: (&str, String), right: (&str, String)) {
    let _ = writeln!(
        html,
        "<div class=\"row{}\"><div class=\"cell\"><span class=\"label\">{}</span><span>{}</span></div>\
         <div class=\"cell\"><span class=\"label\">{}</span><span>{}</span></div></div>",
        class, left.0, left.1, right.0, right.1
    );
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::services::SummaryService,
        domain::{DateWindow, TransactionType},
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::num::NonZeroUsize;

    fn entry(id: usize, kind: TransactionType) -> Transaction {
        Transaction {
            id: format!("id-{}", id),
            date: NaiveDate::from_ymd_opt(2024, 3, 1 + (id % 28) as u32).unwrap(),
            kind,
            party: format!("Party <{}>", id),
            particulars: String::new(),
            labels: String::new(),
            amount: Decimal::from(10),
            timestamp: id as i64,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn renders_one_sheet_per_page() {
        let mut transactions: Vec<Transaction> =
            (0..7).map(|i| entry(i, TransactionType::Receipt)).collect();
        transactions.push(entry(20, TransactionType::Expenditure));
        let window = DateWindow::month_of(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let summary = SummaryService::summarize(&transactions, window, Decimal::ZERO);
        let view = SummaryService::apply_search(&summary, "party");
        let export = ReportExport::new(
            &view,
            CurrencySettings::default(),
            NonZeroUsize::new(5).unwrap(),
        );

        let html = render_document(&export);
        assert_eq!(html.matches("<section class=\"sheet\">").count(), 2);
        assert!(html.contains("Page 1 of 2"));
        assert!(html.contains("Page 2 of 2"));
        assert!(html.contains("(Filtered: &quot;party&quot;)"));
        assert!(html.contains("Party &lt;3&gt;"));
        assert!(!html.contains("Party <3>"));
        assert!(html.contains("Carried Forward (C/F)"));
        assert!(html.contains("₹50.00"));
    }
}
