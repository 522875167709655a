//! Transaction command implementations

use anyhow::{Context, Result};
use budget_core::models::{NewTransaction, TransactionType};
use budget_core::{MonthFilter, SortKey, TransactionView, TypeFilter, YearFilter};

use super::{money, parse_date, parse_kind, truncate, ApiContext};

/// Signed amount right-aligned to 14 columns, coloured after padding
pub fn amount_cell(currency: &str, kind: TransactionType, amount: f64) -> String {
    match kind {
        // Red for expenses
        TransactionType::Expense => {
            format!("\x1b[31m{:>14}\x1b[0m", format!("-{}", money(currency, amount)))
        }
        // Green for income
        TransactionType::Income => {
            format!("\x1b[32m{:>14}\x1b[0m", format!("+{}", money(currency, amount)))
        }
    }
}

pub async fn cmd_transactions_list(
    ctx: &ApiContext,
    month: &str,
    year: Option<&str>,
    kind: &str,
    sort: &str,
    limit: usize,
) -> Result<()> {
    let transactions = ctx
        .client
        .list_transactions()
        .await
        .context("Failed to load transactions")?;

    let mut view = TransactionView::current_year()
        .month(MonthFilter::parse(month))
        .kind(TypeFilter::parse(kind))
        .sort(SortKey::parse(sort));
    if let Some(year) = year {
        view = view.year(YearFilter::parse(year));
    }
    let rows = view.apply(&transactions);

    if rows.is_empty() {
        println!("No transactions match these filters.");
        if transactions.is_empty() {
            println!("Add one with:");
            println!("  budget transactions add --category Groceries --amount 500 --description \"Weekly shop\"");
        }
        return Ok(());
    }

    let currency = ctx.currency().await;

    println!();
    println!(
        "📝 Transactions ({} of {}, {})",
        rows.len().min(limit),
        rows.len(),
        view.sort_key()
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in rows.iter().take(limit) {
        let recurring = if tx.is_recurring { " 🔁" } else { "" };

        println!(
            "   {} │ {} │ {:<16} │ {}{}",
            tx.date,
            amount_cell(&currency, tx.kind, tx.amount),
            truncate(&tx.category, 16),
            truncate(&tx.description, 32),
            recurring
        );
    }

    if rows.len() > limit {
        println!();
        println!("   ... {} more (use --limit to show more)", rows.len() - limit);
    }

    Ok(())
}

pub async fn cmd_transactions_add(
    ctx: &ApiContext,
    date: Option<&str>,
    kind: &str,
    category: &str,
    amount: f64,
    description: &str,
) -> Result<()> {
    let tx = NewTransaction {
        date: parse_date(date)?,
        amount,
        description: description.to_string(),
        category: category.to_string(),
        kind: parse_kind(kind)?,
    };

    let created = ctx
        .client
        .create_transaction(&tx)
        .await
        .context("Failed to add transaction")?;

    println!("✅ Added transaction {}", created.id);
    println!(
        "   {} │ {} │ {} │ {}",
        created.date,
        created.kind,
        created.category,
        truncate(&created.description, 40)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_transactions_edit(
    ctx: &ApiContext,
    id: &str,
    date: Option<&str>,
    kind: Option<&str>,
    category: Option<&str>,
    amount: Option<f64>,
    description: Option<&str>,
) -> Result<()> {
    let existing = ctx
        .client
        .find_transaction(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Transaction {} not found", id))?;

    let mut tx = NewTransaction::from(&existing);
    if date.is_some() {
        tx.date = parse_date(date)?;
    }
    if let Some(kind) = kind {
        tx.kind = parse_kind(kind)?;
    }
    if let Some(category) = category {
        tx.category = category.to_string();
    }
    if let Some(amount) = amount {
        tx.amount = amount;
    }
    if let Some(description) = description {
        tx.description = description.to_string();
    }

    ctx.client
        .update_transaction(id, &tx)
        .await
        .context("Failed to update transaction")?;

    println!("✅ Updated transaction {}", id);
    Ok(())
}

pub async fn cmd_transactions_delete(ctx: &ApiContext, id: &str) -> Result<()> {
    ctx.client
        .delete_transaction(id)
        .await
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}
