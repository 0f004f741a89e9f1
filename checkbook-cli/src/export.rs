//! CSV export sink: one sheet per file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use checkbook_core::models::{Entry, Statement};
use checkbook_core::report::{
    BreakdownTableRow, ExpenseListingRow, ExpenseTableRow, IncomeListingRow, MonthlySummaryRow,
    SummaryTableRow, YearlySummaryRow, summary_rows,
};

fn write_sheet<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush '{}'", path.display()))?;
    Ok(())
}

/// Writes the three report sheets for one entry: `taxes.csv`,
/// `expenses.csv`, and `summary.csv`.
///
/// The summary's final net is the sum of the stored per-line nets, matching
/// the sheet a user would have downloaded when the entry was computed.
pub fn write_entry_sheets(entry: &Entry, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    let taxes = out_dir.join("taxes.csv");
    write_sheet(&taxes, entry.rows.iter().map(BreakdownTableRow::from))?;

    let expenses = out_dir.join("expenses.csv");
    write_sheet(&expenses, entry.expenses.iter().map(ExpenseTableRow::from))?;

    let total_tax: Decimal = entry.rows.iter().map(|row| row.total_tax).sum();
    let total_expenses: Decimal = entry.expenses.iter().map(|line| line.amount).sum();
    let final_net: Decimal = entry.final_nets.iter().copied().sum();

    let summary = out_dir.join("summary.csv");
    write_sheet::<SummaryTableRow>(
        &summary,
        summary_rows(total_tax, total_expenses, final_net),
    )?;

    Ok(vec![taxes, expenses, summary])
}

/// Writes the statement sheets: monthly and yearly summaries plus the flat
/// income and expense listings.
pub fn write_statement_sheets(statement: &Statement, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    let monthly = out_dir.join("monthly.csv");
    write_sheet(&monthly, statement.monthly.iter().map(MonthlySummaryRow::from))?;

    let yearly = out_dir.join("yearly.csv");
    write_sheet(&yearly, statement.yearly.iter().map(YearlySummaryRow::from))?;

    let incomes = out_dir.join("incomes.csv");
    write_sheet(
        &incomes,
        statement
            .monthly
            .iter()
            .flat_map(|bucket| bucket.incomes.iter())
            .map(IncomeListingRow::from),
    )?;

    let expenses = out_dir.join("expenses.csv");
    write_sheet(
        &expenses,
        statement
            .monthly
            .iter()
            .flat_map(|bucket| bucket.expenses.iter())
            .map(ExpenseListingRow::from),
    )?;

    Ok(vec![monthly, yearly, incomes, expenses])
}
