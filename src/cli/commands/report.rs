use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::state::View;
use crate::cli::ui::sheet;
use crate::domain::transaction::parse_date;
use crate::domain::DateWindow;
use crate::export::{ExportFormat, ReportExport};

const PERIOD_USAGE: &str = "usage: period <start YYYY-MM-DD> <end YYYY-MM-DD> | period month [YYYY-MM]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Report,
            "report",
            "Show the report for the selected period",
            "report",
            cmd_report,
        ),
        CommandEntry::new(
            CommandGroup::Report,
            "period",
            "Set the report period",
            "period <start> <end> | period month [YYYY-MM]",
            cmd_period,
        )
        .with_example("period 2024-04-01 2024-06-30  |  period month 2024-02"),
        CommandEntry::new(
            CommandGroup::Report,
            "search",
            "Filter the report by particulars, party, amount or date",
            "search [query]",
            cmd_search,
        )
        .with_example("search rent"),
        CommandEntry::new(
            CommandGroup::Report,
            "pages",
            "Show the report as paginated ledger sheets",
            "pages",
            cmd_pages,
        ),
        CommandEntry::new(
            CommandGroup::Report,
            "export",
            "Write the report as a spreadsheet (csv) or print document (html)",
            "export <csv|print> [path]",
            cmd_export,
        )
        .with_example("export csv ~/reports"),
    ]
}

fn cmd_report(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.state.view = View::Report;
    let view = context.report_view();
    output_section("Account Master Report");
    io::print_info(format!("Period: {}", view.window));
    if let Some(query) = &view.search {
        io::print_info(format!("Filtered by: \"{}\"", query));
    }
    io::print_info(format!(
        "Initial opening balance: {}",
        context.format_amount(context.initial_balance)
    ));
    output::raw(sheet::render_report(&view, &context.currency()));
    Ok(())
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window = match args {
        ["month"] => DateWindow::month_of(context.clock.today()),
        ["month", month] => DateWindow::month_of(parse_month(month)?),
        [start, end] => DateWindow::new(parse_date(start)?, parse_date(end)?)?,
        _ => return Err(CommandError::InvalidArguments(PERIOD_USAGE.into())),
    };
    context.state.window = window;
    io::print_success(format!("Report period set to {}.", window));
    Ok(())
}

fn parse_month(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .ok()
        .filter(|date| date.day() == 1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", input)))
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.state.set_search(&args.join(" "));
    match context.state.search() {
        Some(query) => {
            let view = context.report_view();
            io::print_info(format!(
                "Search \"{}\": {} receipt(s), {} expenditure(s).",
                query,
                view.receipts.len(),
                view.expenditures.len()
            ));
        }
        None => io::print_info("Search cleared."),
    }
    Ok(())
}

fn cmd_pages(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.report_view();
    let currency = context.currency();
    let export = ReportExport::new(&view, currency.clone(), context.config.page_size());
    output_section(format!("Ledger Sheets: {}", view.window));
    if let Some(query) = &view.search {
        io::print_info(format!("Filtered: \"{}\"", query));
    }
    for page in export.pages() {
        output::separator();
        output::raw(sheet::render_page(&page, &currency));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let format: ExportFormat = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: export <csv|print> [path]".into()))?
        .parse()?;
    let target = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => context.config.resolve_export_dir(),
    };
    let view = context.report_view();
    let export = ReportExport::new(&view, context.currency(), context.config.page_size());
    let path = export.write_to(format, &target)?;
    io::print_success(format!("Exported {} to {}.", format, path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_argument_parses() {
        assert_eq!(
            parse_month("2024-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("February").is_err());
    }
}
