//! Import/export and template command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use budget_core::api::export_file_name;
use budget_core::templates;

use super::ApiContext;

pub async fn cmd_import(ctx: &ApiContext, file: &Path) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let report = ctx
        .client
        .import_csv_file(file)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("✅ {}", report.message);
    if let Some(errors) = &report.errors {
        println!("   ⚠️  {} rows were rejected:", errors.len());
        for error in errors.iter().take(10) {
            println!("      {}", error);
        }
        if errors.len() > 10 {
            println!("      ... and {} more", errors.len() - 10);
        }
    }
    Ok(())
}

pub async fn cmd_export(
    ctx: &ApiContext,
    fiscal_year: Option<i32>,
    output: Option<&Path>,
) -> Result<()> {
    let csv = ctx
        .client
        .export_csv(fiscal_year)
        .await
        .context("Failed to export transactions")?;

    let default_name = export_file_name(fiscal_year);
    let path = output.unwrap_or_else(|| Path::new(&default_name));
    fs::write(path, &csv).with_context(|| format!("Failed to write {}", path.display()))?;

    let rows = csv.lines().count().saturating_sub(1);
    println!("📤 Exported {} transactions to {}", rows, path.display());
    Ok(())
}

pub fn cmd_template_sample(output: &Path) -> Result<()> {
    let csv = templates::sample_csv()?;
    write_template(output, &csv)
}

pub async fn cmd_template_categories(ctx: &ApiContext, output: &Path) -> Result<()> {
    let categories = ctx
        .client
        .list_categories(None)
        .await
        .context("Failed to load categories")?;
    write_template(output, &templates::categories_text(&categories))
}

pub async fn cmd_template_with_categories(ctx: &ApiContext, output: &Path) -> Result<()> {
    let categories = ctx
        .client
        .list_categories(None)
        .await
        .context("Failed to load categories")?;
    let today = chrono::Local::now().date_naive();
    let csv = templates::template_with_categories(&categories, today)?;
    write_template(output, &csv)
}

fn write_template(output: &Path, content: &str) -> Result<()> {
    fs::write(output, content).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("📄 Wrote {}", output.display());
    Ok(())
}
