//! Terminal rendering of the report tables.

use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::settings::Style;

use checkbook_core::models::{
    BreakdownTotals, Entry, ExpenseAllocation, Statement, TaxBreakdown, TaxBreakdownRow,
};

pub fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn render(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

fn breakdown_cells(rows: &[TaxBreakdownRow], totals: &BreakdownTotals) -> Vec<Vec<String>> {
    let mut cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.sender.clone(),
                row.income_type.to_string(),
                row.date.to_string(),
                money(row.gross),
                money(row.se_tax),
                money(row.fed_tax),
                money(row.state_tax),
                money(row.total_tax),
                money(row.net),
            ]
        })
        .collect();

    cells.push(vec![
        "Totals".to_string(),
        String::new(),
        String::new(),
        String::new(),
        money(totals.se_tax),
        money(totals.fed_tax),
        money(totals.state_tax),
        money(totals.total_tax),
        money(totals.total_net),
    ]);

    cells
}

const BREAKDOWN_HEADERS: [&str; 9] = [
    "Sender",
    "Type",
    "Date",
    "Gross",
    "SE Tax",
    "Fed Tax",
    "State Tax",
    "Total Tax",
    "Net",
];

pub fn print_breakdown(breakdown: &TaxBreakdown) {
    println!(
        "{}",
        render(
            &BREAKDOWN_HEADERS,
            breakdown_cells(&breakdown.rows, &breakdown.totals),
        )
    );
}

pub fn print_allocation(allocation: &ExpenseAllocation) {
    let rows = allocation
        .lines
        .iter()
        .map(|line| {
            vec![
                line.sender.clone(),
                line.name.clone(),
                money(line.amount),
                money(line.net_after),
            ]
        })
        .collect();

    println!(
        "{}",
        render(&["Sender", "Expense", "Amount", "Net After"], rows)
    );
}

pub fn print_summary(total_tax: Decimal, total_expenses: Decimal, final_net: Decimal) {
    let rows = vec![
        vec!["Total Tax".to_string(), money(total_tax)],
        vec!["Total Expenses".to_string(), money(total_expenses)],
        vec!["Final Net".to_string(), money(final_net)],
    ];

    println!("{}", render(&["Category", "Value"], rows));
}

pub fn print_entry_listing(entries: &[Entry]) {
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                entry.title.clone(),
                entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
                entry.rows.len().to_string(),
                entry.expenses.len().to_string(),
            ]
        })
        .collect();

    println!(
        "{}",
        render(&["Id", "Title", "Saved", "Checks", "Expenses"], rows)
    );
}

/// Prints a saved entry exactly as stored, without recomputing any taxes.
pub fn print_entry(entry: &Entry) {
    println!("Entry {} \"{}\" saved {}", entry.id, entry.title, entry.created_at.format("%Y-%m-%d %H:%M"));

    let totals = BreakdownTotals::from_rows(&entry.rows);
    println!("{}", render(&BREAKDOWN_HEADERS, breakdown_cells(&entry.rows, &totals)));

    let expense_rows = entry
        .expenses
        .iter()
        .map(|line| {
            vec![
                line.sender.clone(),
                line.name.clone(),
                money(line.amount),
                money(line.net_after),
            ]
        })
        .collect();
    println!(
        "{}",
        render(&["Sender", "Expense", "Amount", "Net After"], expense_rows)
    );

    let total_expenses: Decimal = entry.expenses.iter().map(|line| line.amount).sum();
    let final_net: Decimal = entry.final_nets.iter().copied().sum();
    print_summary(totals.total_tax, total_expenses, final_net);
}

pub fn print_statement(statement: &Statement) {
    let monthly_rows = statement
        .monthly
        .iter()
        .map(|bucket| {
            vec![
                bucket.month.to_string(),
                money(bucket.total_income),
                money(bucket.total_expense),
                money(bucket.total_tax_due),
            ]
        })
        .collect();
    println!("Monthly");
    println!(
        "{}",
        render(&["Month", "Income", "Expenses", "Taxes Due"], monthly_rows)
    );

    let yearly_rows = statement
        .yearly
        .iter()
        .map(|bucket| {
            vec![
                bucket.year.to_string(),
                money(bucket.total_income),
                money(bucket.total_expense),
                money(bucket.total_tax_due),
            ]
        })
        .collect();
    println!("Yearly");
    println!(
        "{}",
        render(&["Year", "Income", "Expenses", "Taxes Due"], yearly_rows)
    );
}
