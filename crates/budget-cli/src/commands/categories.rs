//! Category command implementations

use anyhow::{Context, Result};
use budget_core::models::{NewCategory, TransactionType};

use super::{parse_kind, ApiContext};

pub async fn cmd_categories_list(ctx: &ApiContext, kind: Option<&str>) -> Result<()> {
    let kind = kind.map(parse_kind).transpose()?;
    let categories = ctx
        .client
        .list_categories(kind)
        .await
        .context("Failed to load categories")?;

    for group in [TransactionType::Expense, TransactionType::Income] {
        let in_group: Vec<_> = categories.iter().filter(|c| c.kind == group).collect();
        if in_group.is_empty() {
            continue;
        }
        println!();
        let icon = match group {
            TransactionType::Expense => "💸",
            TransactionType::Income => "💰",
        };
        println!("{} {} categories ({})", icon, group, in_group.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for category in in_group {
            let marker = if category.is_predefined { "" } else { "  (custom)" };
            println!("   [{}] {}{}", category.id, category.name, marker);
        }
    }
    Ok(())
}

pub async fn cmd_categories_add(ctx: &ApiContext, name: &str, kind: &str) -> Result<()> {
    let category = ctx
        .client
        .create_category(&NewCategory {
            name: name.trim().to_string(),
            kind: parse_kind(kind)?,
        })
        .await
        .context("Failed to add category")?;
    println!("✅ Added {} category {} ({})", category.kind, category.name, category.id);
    Ok(())
}

pub async fn cmd_categories_rename(ctx: &ApiContext, id: &str, name: &str) -> Result<()> {
    let categories = ctx.client.list_categories(None).await?;
    let existing = categories
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow::anyhow!("Category {} not found", id))?;

    ctx.client
        .update_category(
            id,
            &NewCategory {
                name: name.trim().to_string(),
                kind: existing.kind,
            },
        )
        .await
        .context("Failed to rename category")?;
    println!("✅ Renamed {} to {}", existing.name, name.trim());
    Ok(())
}

pub async fn cmd_categories_delete(ctx: &ApiContext, id: &str) -> Result<()> {
    ctx.client
        .delete_category(id)
        .await
        .with_context(|| format!("Failed to delete category {}", id))?;
    println!("🗑️  Deleted category {}", id);
    Ok(())
}
