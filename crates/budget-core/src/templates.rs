//! Import templates offered for download
//!
//! The server parses uploaded CSV files with the header
//! `date,type,category,description,amount`. These helpers produce files in
//! that shape so users have a starting point.

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{Category, TransactionType};

/// Column order expected by `POST /import/csv`
pub const IMPORT_HEADER: [&str; 5] = ["date", "type", "category", "description", "amount"];

const SAMPLE_ROWS: [[&str; 5]; 5] = [
    ["2025-01-15", "expense", "Groceries", "Weekly grocery shopping", "5420.50"],
    ["2025-01-16", "expense", "Fuel", "Petrol for car", "2000.00"],
    ["2025-01-10", "income", "Paycheck", "Monthly salary", "45000.00"],
    ["2025-01-20", "expense", "Restaurants", "Dinner with family", "1500.00"],
    ["2025-01-22", "expense", "Phone", "Mobile bill payment", "599.00"],
];

const TEMPLATE_EXPENSE_ROWS: usize = 5;
const TEMPLATE_INCOME_ROWS: usize = 2;

/// Fixed example file with a handful of typical rows
pub fn sample_csv() -> Result<String> {
    write_rows(SAMPLE_ROWS.iter().map(|row| row.map(str::to_string)))
}

/// Example file built from the user's own categories
///
/// Uses the first five expense categories (1000.00 each) and the first two
/// income categories (5000.00 each). The n-th row of each group is dated n days
/// before `today`.
pub fn template_with_categories(categories: &[Category], today: NaiveDate) -> Result<String> {
    let expense = example_rows(
        categories,
        TransactionType::Expense,
        TEMPLATE_EXPENSE_ROWS,
        "1000.00",
        today,
    );
    let income = example_rows(
        categories,
        TransactionType::Income,
        TEMPLATE_INCOME_ROWS,
        "5000.00",
        today,
    );
    write_rows(expense.into_iter().chain(income))
}

fn example_rows(
    categories: &[Category],
    kind: TransactionType,
    limit: usize,
    amount: &str,
    today: NaiveDate,
) -> Vec<[String; 5]> {
    categories
        .iter()
        .filter(|c| c.kind == kind)
        .take(limit)
        .enumerate()
        .map(|(index, cat)| {
            let date = today - Duration::days(index as i64);
            [
                date.format("%Y-%m-%d").to_string(),
                kind.as_str().to_string(),
                cat.name.clone(),
                format!("Sample {} transaction", cat.name),
                amount.to_string(),
            ]
        })
        .collect()
}

/// Plain-text list of category names, expense block first
pub fn categories_text(categories: &[Category]) -> String {
    let names = |kind: TransactionType| {
        categories
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "EXPENSE CATEGORIES:\n{}\n\nINCOME CATEGORIES:\n{}",
        names(TransactionType::Expense),
        names(TransactionType::Income)
    )
}

fn write_rows(rows: impl IntoIterator<Item = [String; 5]>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(IMPORT_HEADER)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidData(format!("Template is not UTF-8: {}", e)))
}
