//! Recurring transaction command implementations

use anyhow::{Context, Result};
use budget_core::models::NewRecurringRule;

use super::{money, parse_date, parse_kind, truncate, ApiContext};

pub async fn cmd_recurring_list(ctx: &ApiContext) -> Result<()> {
    let rules = ctx
        .client
        .list_recurring()
        .await
        .context("Failed to load recurring transactions")?;

    if rules.is_empty() {
        println!("No recurring transactions. Add one with:");
        println!("  budget recurring add --category Paycheck --type income --amount 45000 --day 1");
        return Ok(());
    }

    let currency = ctx.currency().await;

    println!();
    println!("🔁 Recurring Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for rule in &rules {
        let status = if rule.is_active { "active" } else { "paused" };
        let until = rule
            .end_date
            .map(|d| format!(" until {}", d))
            .unwrap_or_default();
        println!(
            "   [{}] {:>7} │ {:>12} │ {:<16} │ day {:>2} from {}{} │ {}",
            rule.id,
            rule.kind.as_str(),
            money(&currency, rule.amount),
            truncate(&rule.category, 16),
            rule.day_of_month,
            rule.start_date,
            until,
            status
        );
        if !rule.description.is_empty() {
            println!("         {}", truncate(&rule.description, 50));
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_recurring_add(
    ctx: &ApiContext,
    kind: &str,
    category: &str,
    amount: f64,
    description: &str,
    day: u32,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let rule = NewRecurringRule {
        amount,
        description: description.to_string(),
        category: category.to_string(),
        kind: parse_kind(kind)?,
        day_of_month: day,
        start_date: parse_date(start)?,
        end_date: end.map(|e| parse_date(Some(e))).transpose()?,
    };

    let created = ctx
        .client
        .create_recurring(&rule)
        .await
        .context("Failed to add recurring transaction")?;

    println!(
        "✅ Added recurring {} {} on day {} ({})",
        created.kind, created.category, created.day_of_month, created.id
    );
    println!("   Run 'budget recurring generate' to create this month's transactions.");
    Ok(())
}

/// Field changes for `recurring edit`; `None` keeps the stored value
#[derive(Default)]
pub struct RecurringEdit<'a> {
    pub kind: Option<&'a str>,
    pub category: Option<&'a str>,
    pub amount: Option<f64>,
    pub description: Option<&'a str>,
    pub day: Option<u32>,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    pub clear_end: bool,
}

pub async fn cmd_recurring_edit(ctx: &ApiContext, id: &str, edit: RecurringEdit<'_>) -> Result<()> {
    let rules = ctx.client.list_recurring().await?;
    let existing = rules
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow::anyhow!("Recurring transaction {} not found", id))?;

    let mut rule = NewRecurringRule::from(existing);
    if let Some(kind) = edit.kind {
        rule.kind = parse_kind(kind)?;
    }
    if let Some(category) = edit.category {
        rule.category = category.to_string();
    }
    if let Some(amount) = edit.amount {
        rule.amount = amount;
    }
    if let Some(description) = edit.description {
        rule.description = description.to_string();
    }
    if let Some(day) = edit.day {
        rule.day_of_month = day;
    }
    if edit.start.is_some() {
        rule.start_date = parse_date(edit.start)?;
    }
    if edit.clear_end {
        rule.end_date = None;
    } else if edit.end.is_some() {
        rule.end_date = Some(parse_date(edit.end)?);
    }

    ctx.client
        .update_recurring(id, &rule)
        .await
        .context("Failed to update recurring transaction")?;
    println!("✅ Updated recurring transaction {}", id);
    Ok(())
}

pub async fn cmd_recurring_delete(ctx: &ApiContext, id: &str) -> Result<()> {
    ctx.client
        .delete_recurring(id)
        .await
        .with_context(|| format!("Failed to delete recurring transaction {}", id))?;
    println!("🗑️  Deleted recurring transaction {}", id);
    Ok(())
}

pub async fn cmd_recurring_toggle(ctx: &ApiContext, id: &str) -> Result<()> {
    let response = ctx
        .client
        .toggle_recurring(id)
        .await
        .with_context(|| format!("Failed to toggle recurring transaction {}", id))?;
    let icon = if response.is_active { "▶️ " } else { "⏸️ " };
    println!("{} {}", icon, response.message);
    Ok(())
}

pub async fn cmd_recurring_generate(ctx: &ApiContext) -> Result<()> {
    let response = ctx
        .client
        .generate_recurring()
        .await
        .context("Failed to generate recurring transactions")?;
    println!("✅ {}", response.message);
    Ok(())
}
