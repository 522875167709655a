//! Settings command implementations

use anyhow::{Context, Result};

use super::ApiContext;

/// Symbols offered by the settings screen
pub const COMMON_CURRENCIES: [&str; 6] = ["₹", "$", "€", "£", "¥", "A$"];

pub async fn cmd_settings_show(ctx: &ApiContext) -> Result<()> {
    let settings = ctx
        .client
        .settings()
        .await
        .context("Failed to load settings")?;
    println!("⚙️  Settings");
    println!("   Currency: {}", settings.currency);
    println!("   API:      {}", ctx.client.base_url());
    Ok(())
}

pub async fn cmd_settings_currency(ctx: &ApiContext, symbol: &str) -> Result<()> {
    ctx.client
        .update_currency(symbol)
        .await
        .context("Failed to update currency")?;
    println!("✅ Currency set to {}", symbol.trim());
    if !COMMON_CURRENCIES.contains(&symbol.trim()) {
        println!("   Common symbols: {}", COMMON_CURRENCIES.join(" "));
    }
    Ok(())
}
