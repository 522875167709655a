//! Report command implementations

use anyhow::{Context, Result};
use budget_core::models::MonthFlow;
use budget_core::{CalendarPeriod, FlowTotals};
use chrono::Datelike;

use super::{money, parse_kind, truncate, ApiContext};

/// Fiscal year (April to March) containing today, by its starting year
pub fn current_fiscal_year() -> i32 {
    let today = chrono::Local::now().date_naive();
    if today.month() >= 4 {
        today.year()
    } else {
        today.year() - 1
    }
}

pub async fn cmd_report_yearly(ctx: &ApiContext, year: i32) -> Result<()> {
    let months = ctx
        .client
        .yearly(year)
        .await
        .with_context(|| format!("Failed to load yearly report for {}", year))?;
    let currency = ctx.currency().await;
    print_flow_table(&currency, &format!("📊 Year {}", year), &months);
    Ok(())
}

pub async fn cmd_report_fiscal(ctx: &ApiContext, start_year: i32) -> Result<()> {
    let months = ctx
        .client
        .fiscal_year(start_year)
        .await
        .with_context(|| format!("Failed to load fiscal year {}", start_year))?;
    let currency = ctx.currency().await;
    let title = format!(
        "📊 Fiscal Year {}-{} (April to March)",
        start_year,
        (start_year + 1) % 100
    );
    print_flow_table(&currency, &title, &months);
    Ok(())
}

pub async fn cmd_report_trend(ctx: &ApiContext, months: u32) -> Result<()> {
    let rows = ctx
        .client
        .trend(months)
        .await
        .context("Failed to load trend")?;
    let currency = ctx.currency().await;
    print_flow_table(&currency, &format!("📈 Last {} Months", months), &rows);
    Ok(())
}

pub async fn cmd_report_breakdown(
    ctx: &ApiContext,
    period: CalendarPeriod,
    kind: &str,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let shares = ctx
        .client
        .category_breakdown(period, kind)
        .await
        .context("Failed to load category breakdown")?;

    println!();
    println!("🥧 {} by Category, {}", capitalize(kind.as_str()), period.label());
    println!("   ─────────────────────────────────────────────────────────────");

    if shares.is_empty() {
        println!("   No {} transactions this month.", kind);
        return Ok(());
    }

    let currency = ctx.currency().await;
    for share in &shares {
        let bar_len = (share.percentage / 5.0).round() as usize;
        println!(
            "   {:<20} {:>14} {:>6.1}% {}",
            truncate(&share.category, 20),
            money(&currency, share.amount),
            share.percentage,
            "█".repeat(bar_len)
        );
    }
    Ok(())
}

pub async fn cmd_report_burn_rate(ctx: &ApiContext) -> Result<()> {
    let burn = ctx
        .client
        .burn_rate()
        .await
        .context("Failed to load burn rate")?;
    let currency = ctx.currency().await;

    println!();
    println!("🔥 Burn Rate");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Monthly burn (3-month average): {}",
        money(&currency, burn.monthly_burn_rate)
    );
    println!(
        "   Current balance:                {}",
        money(&currency, burn.current_balance)
    );
    if burn.monthly_burn_rate > 0.0 {
        println!("   Runway:                         {:.1} months", burn.runway_months);
    } else {
        println!("   Runway:                         n/a (no recent spending)");
    }
    Ok(())
}

fn print_flow_table(currency: &str, title: &str, months: &[MonthFlow]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<10} {:>14} {:>14} {:>14}",
        "Month", "Income", "Expense", "Balance"
    );

    for month in months {
        println!(
            "   {:<10} {:>14} {:>14} {:>14}",
            month.month,
            money(currency, month.income),
            money(currency, month.expense),
            money(currency, month.balance)
        );
    }

    let totals = FlowTotals::from_months(months);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<10} {:>14} {:>14} {:>14}",
        "Total",
        money(currency, totals.income),
        money(currency, totals.expense),
        money(currency, totals.balance)
    );
    if totals.income > 0.0 {
        println!("   Spent {:.1}% of income", totals.spend_ratio());
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
