//! CSV export of the currently filtered expense list.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};
use tracing::info;

use crate::core::utils::{ensure_dir, format_date};
use crate::domain::expense::Expense;
use crate::errors::{ExpenseError, Result};
use crate::storage::json_backend::{tmp_path, write_atomic};

pub const EXPORT_FILE_NAME: &str = "expenses_report.csv";

const HEADERS: [&str; 4] = ["Date", "Description", "Category", "Amount"];

pub struct ExportService;

impl ExportService {
    /// Writes the header plus one row per expense and returns the row count.
    /// Fields are quoted only when needed; embedded quotes are doubled.
    pub fn write_csv<W: Write>(expenses: &[Expense], writer: W, date_format: &str) -> Result<usize> {
        ensure_not_empty(expenses)?;
        let mut csv_writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        csv_writer.write_record(HEADERS)?;
        for expense in expenses {
            let date = format_date(&expense.date, date_format)?;
            let amount = expense.amount.to_string();
            csv_writer.write_record([
                date.as_str(),
                expense.description.as_str(),
                expense.category.as_str(),
                amount.as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(expenses.len())
    }

    pub fn to_csv_string(expenses: &[Expense], date_format: &str) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write_csv(expenses, &mut buffer, date_format)?;
        String::from_utf8(buffer).map_err(|err| ExpenseError::Export(err.to_string()))
    }

    /// Writes `expenses_report.csv` into `dir`. The report is rendered in
    /// full before the file is touched, so a failed export leaves nothing
    /// behind and never truncates an earlier report.
    pub fn export_to_dir(expenses: &[Expense], dir: &Path, date_format: &str) -> Result<PathBuf> {
        let csv = Self::to_csv_string(expenses, date_format)?;
        ensure_dir(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &csv)?;
        fs::rename(&tmp, &path)?;
        info!(rows = expenses.len(), path = %path.display(), "expenses exported");
        Ok(path)
    }
}

fn ensure_not_empty(expenses: &[Expense]) -> Result<()> {
    if expenses.is_empty() {
        return Err(ExpenseError::EmptyExport);
    }
    Ok(())
}
