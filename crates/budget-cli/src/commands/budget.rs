//! Monthly budget command implementations

use anyhow::{bail, Context, Result};
use budget_core::budget::{latest_per_category, parse_planned_edits};
use budget_core::models::BudgetEntry;
use budget_core::{ApplyScope, BudgetPlanner, CalendarPeriod, MonthlyTotals};

use super::{money, truncate, ApiContext};

pub async fn cmd_budget_show(ctx: &ApiContext, period: CalendarPeriod) -> Result<()> {
    let entries = ctx
        .client
        .monthly(period)
        .await
        .with_context(|| format!("Failed to load budget for {}", period.label()))?;
    let currency = ctx.currency().await;
    print_budget_table(&currency, period, &entries);
    Ok(())
}

/// Split `CATEGORY=AMOUNT` arguments into raw (category, value) pairs
pub fn parse_assignments(assignments: &[String]) -> Result<Vec<(String, String)>> {
    assignments
        .iter()
        .map(|arg| match arg.split_once('=') {
            Some((category, value)) if !category.trim().is_empty() => {
                Ok((category.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("Expected CATEGORY=AMOUNT, got '{}'", arg),
        })
        .collect()
}

pub async fn cmd_budget_set(
    ctx: &ApiContext,
    period: CalendarPeriod,
    assignments: &[String],
    scope: ApplyScope,
) -> Result<()> {
    let raw = parse_assignments(assignments)?;
    let latest = latest_per_category(&raw);
    if latest.len() < raw.len() {
        println!("   ⚠️  Categories given more than once use their last value");
    }
    let edits = parse_planned_edits(&latest);

    for (category, value) in &latest {
        if !edits.iter().any(|(c, _)| c == category) {
            println!("   ⚠️  Skipping {}: '{}' is not a valid amount", category, value);
        }
    }
    if edits.is_empty() {
        bail!("No valid planned amounts given");
    }

    let planner = BudgetPlanner::new(ctx.client.clone());
    let entries = planner
        .save_planned(period, &edits, scope)
        .await
        .context("Failed to save budgets")?;

    match scope {
        ApplyScope::TwelveMonths => println!(
            "✅ Budgets saved and applied to {} and the following 11 months",
            period.label()
        ),
        ApplyScope::CurrentMonth => {
            println!("✅ Budgets saved for {} only", period.label())
        }
    }

    let currency = ctx.currency().await;
    print_budget_table(&currency, period, &entries);
    Ok(())
}

pub async fn cmd_budget_copy_forward(ctx: &ApiContext, period: CalendarPeriod) -> Result<()> {
    let planner = BudgetPlanner::new(ctx.client.clone());
    let outcome = planner
        .copy_to_next_year(period)
        .await
        .context("Failed to copy budgets")?;

    println!(
        "✅ Copied {} budgets from {} to the next 12 months",
        outcome.categories,
        period.label()
    );
    Ok(())
}

fn print_budget_table(currency: &str, period: CalendarPeriod, entries: &[BudgetEntry]) {
    println!();
    println!("📅 Budget for {}", period.label());
    println!("   ─────────────────────────────────────────────────────────────");

    if entries.is_empty() {
        println!("   No expense categories found.");
        return;
    }

    println!(
        "   {:<20} {:>14} {:>14} {:>14}",
        "Category", "Actual", "Planned", "Difference"
    );
    for entry in entries {
        let difference = money(currency, entry.difference);
        let difference = if entry.is_over_budget() {
            format!("\x1b[31m{:>14}\x1b[0m", difference) // Red when over budget
        } else {
            format!("{:>14}", difference)
        };
        println!(
            "   {:<20} {:>14} {:>14} {}",
            truncate(&entry.category, 20),
            money(currency, entry.actual),
            money(currency, entry.planned),
            difference
        );
    }

    let totals = MonthlyTotals::from_entries(entries);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<20} {:>14} {:>14} {:>14}",
        "Total",
        money(currency, totals.actual),
        money(currency, totals.planned),
        money(currency, totals.remaining)
    );

    if !totals.over_budget.is_empty() {
        println!();
        println!("   ⚠️  Over budget: {}", totals.over_budget.join(", "));
    }
}
