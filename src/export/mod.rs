//! Export sinks for a prepared report: a side-by-side spreadsheet and a paginated print
//! document. Sinks only read the report; nothing here mutates ledger state.

pub mod print;
pub mod spreadsheet;

use std::{
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    core::services::ReportService,
    currency::CurrencySettings,
    domain::{DateWindow, PageData, ReportView},
};

const FILE_PREFIX: &str = "AccountMaster_Report";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown export format `{0}` (expected csv or print)")]
    Format(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Print,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "csv",
            ExportFormat::Print => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Spreadsheet => f.write_str("spreadsheet"),
            ExportFormat::Print => f.write_str("print document"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" | "excel" | "spreadsheet" | "sheet" => Ok(ExportFormat::Spreadsheet),
            "print" | "html" | "pdf" => Ok(ExportFormat::Print),
            other => Err(ExportError::Format(other.to_string())),
        }
    }
}

/// A report ready to be written out.
#[derive(Debug, Clone)]
pub struct ReportExport<'a> {
    pub view: &'a ReportView,
    pub currency: CurrencySettings,
    pub page_size: NonZeroUsize,
}

impl<'a> ReportExport<'a> {
    pub fn new(view: &'a ReportView, currency: CurrencySettings, page_size: NonZeroUsize) -> Self {
        Self {
            view,
            currency,
            page_size,
        }
    }

    pub fn pages(&self) -> Vec<PageData> {
        ReportService::paginate(
            &self.view.receipts,
            &self.view.expenditures,
            self.view.summary.opening_balance,
            self.page_size,
        )
    }

    pub fn default_file_name(&self, format: ExportFormat) -> String {
        default_file_name(self.view.window, format)
    }

    pub fn render(&self, format: ExportFormat, out: &mut dyn Write) -> ExportResult<()> {
        match format {
            ExportFormat::Spreadsheet => spreadsheet::write_report(self, out),
            ExportFormat::Print => {
                out.write_all(print::render_document(self).as_bytes())?;
                Ok(())
            }
        }
    }

    /// Writes the export. A directory target receives the default file name.
    pub fn write_to(&self, format: ExportFormat, target: &Path) -> ExportResult<PathBuf> {
        let path = if target.is_dir() {
            target.join(self.default_file_name(format))
        } else {
            target.to_path_buf()
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        self.render(format, &mut writer)?;
        writer.flush()?;
        tracing::info!(
            format = %format,
            path = %path.display(),
            rows = self.view.row_count(),
            "report exported"
        );
        Ok(path)
    }
}

pub fn default_file_name(window: DateWindow, format: ExportFormat) -> String {
    format!(
        "{}_{}_{}.{}",
        FILE_PREFIX,
        window.start.format(crate::domain::transaction::DATE_FORMAT),
        window.end.format(crate::domain::transaction::DATE_FORMAT),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn format_names_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Spreadsheet);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Spreadsheet);
        assert_eq!("print".parse::<ExportFormat>().unwrap(), ExportFormat::Print);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::Format(name)) if name == "docx"
        ));
    }

    #[test]
    fn file_name_carries_window() {
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(
            default_file_name(window, ExportFormat::Spreadsheet),
            "AccountMaster_Report_2024-01-01_2024-01-31.csv"
        );
        assert_eq!(
            default_file_name(window, ExportFormat::Print),
            "AccountMaster_Report_2024-01-01_2024-01-31.html"
        );
    }
}
